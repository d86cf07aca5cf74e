//! Reply text layout.
//!
//! Streamed replies arrive as one long run of text. [`format`] breaks it up so numbered lists
//! start on their own line and sentences are separated by a blank line.
//!
//! The reply is re-formatted in full every time a fragment arrives, so both rules skip
//! separators that are already in place. This makes `format` idempotent. Callers still keep the
//! raw accumulated text and format that, rather than appending to already formatted output.
use regex::Regex;
use std::sync::OnceLock;

/// Rewrites `text` so list markers start a line and sentences are separated by a blank line.
///
/// Two rules are applied in order:
///
/// 1. A line break is inserted before every numbered-list marker (`12. `) that doesn't already
///    start a line.
/// 2. A blank line is inserted after every `. ` that is directly followed by an ASCII word
///    character (`[A-Za-z0-9_]`).
///
/// ```
/// assert_eq!(
///     chat_stream::format("CS101 is a great 1. intro course."),
///     "CS101 is a great \n1. \n\nintro course."
/// );
/// ```
#[must_use]
pub fn format(text: &str) -> String {
    let text = break_list_markers(text);
    separate_sentences(&text)
}

fn list_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+\. ").expect("valid regex"))
}

fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\. [A-Za-z0-9_]").expect("valid regex"))
}

fn break_list_markers(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    // Matches always begin at the first digit of a run, so the byte before `start` is never a
    // digit of the same marker.
    for marker in list_marker().find_iter(text) {
        let start = marker.start();
        output.push_str(&text[last..start]);
        if !text[..start].ends_with('\n') {
            output.push('\n');
        }
        last = start;
    }

    output.push_str(&text[last..]);
    output
}

fn separate_sentences(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for boundary in sentence_boundary().find_iter(text) {
        // Split right after the ASCII `. ` pair.
        let split = boundary.start() + 2;
        output.push_str(&text[last..split]);
        output.push_str("\n\n");
        last = split;
    }

    output.push_str(&text[last..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_marker_gets_a_line_break() {
        assert_eq!(
            format("Options: 1. first 2. second"),
            "Options: \n1. \n\nfirst \n2. \n\nsecond"
        );
    }

    #[test]
    fn test_leading_list_marker_is_broken_once() {
        assert_eq!(format("1. one"), "\n1. \n\none");
        assert_eq!(format(&format("1. one")), "\n1. \n\none");
    }

    #[test]
    fn test_marker_already_on_its_own_line_is_untouched() {
        assert_eq!(format("Steps:\n12. go"), "Steps:\n12. \n\ngo");
    }

    #[test]
    fn test_multi_digit_marker_is_not_split() {
        assert_eq!(format("see 123. "), "see \n123. ");
    }

    #[test]
    fn test_sentences_get_a_blank_line() {
        assert_eq!(
            format("It is fun. It is hard. Take it."),
            "It is fun. \n\nIt is hard. \n\nTake it."
        );
    }

    #[test]
    fn test_period_without_following_word_is_untouched() {
        assert_eq!(format("Done. "), "Done. ");
        assert_eq!(format("Done."), "Done.");
        assert_eq!(format("Wait. ..."), "Wait. ...");
        assert_eq!(format("3.14 is pi"), "3.14 is pi");
    }

    #[test]
    fn test_only_ascii_words_start_sentences() {
        assert_eq!(format("Fin. élan"), "Fin. élan");
        assert_eq!(format("Très bien. Ça va"), "Très bien. Ça va");
        assert_eq!(format("Très bien. Oui"), "Très bien. \n\nOui");
        assert_eq!(format("Step. _x"), "Step. \n\n_x");
    }

    #[test]
    fn test_course_example() {
        let formatted = format("CS101 is a great 1. intro course.");

        assert_eq!(formatted, "CS101 is a great \n1. \n\nintro course.");
        assert_eq!(formatted.matches('\n').count(), 3);
    }

    #[test]
    fn test_format_is_idempotent_on_tricky_inputs() {
        let inputs = [
            "",
            "a. 12. b",
            "a. 1",
            "x 1. 2. 3. y",
            "1.  2. x",
            "end.\n1. start. next",
            "a.1. b",
            "no markers at all",
            "Q. 9. A. 8. B",
        ];

        for input in inputs {
            let once = format(input);
            assert_eq!(format(&once), once, "format is not idempotent on {input:?}");
        }
    }
}
