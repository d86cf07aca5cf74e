use chat_stream::{Message, Role};
use std::io::{IsTerminal, Write};

use crate::prelude::*;

/// Renders the transcript tail while it streams.
///
/// Formatting only inserts line breaks inside the last printed line or after it, so each update
/// rewrites the last visible line and prints whatever follows. When stdout isn't a terminal the
/// tail is printed once, after the turn ends.
pub struct TailPrinter {
    previous_output: String,
    is_terminal: bool,
    spinner: Option<spinners::Spinner>,
}

impl TailPrinter {
    pub fn new(quiet: bool) -> Self {
        let is_terminal = std::io::stdout().is_terminal();

        let spinner = if is_terminal && !quiet {
            Some(spinners::Spinner::new(
                spinners::Spinners::OrangeBluePulse,
                "Thinking...".into(),
            ))
        } else {
            None
        };

        Self {
            previous_output: String::new(),
            is_terminal,
            spinner,
        }
    }

    pub fn update(&mut self, content: &str) -> Result<()> {
        if !self.is_terminal || content == self.previous_output {
            return Ok(());
        }

        self.stop_spinner()?;

        let unprinted = unprinted_lines(&self.previous_output, content);

        crossterm::execute!(
            std::io::stdout(),
            crossterm::cursor::MoveToColumn(0),
            crossterm::terminal::Clear(crossterm::terminal::ClearType::CurrentLine)
        )?;
        print!("{unprinted}");
        std::io::stdout().flush()?;

        self.previous_output = content.to_string();

        Ok(())
    }

    pub fn finish(mut self, content: &str) -> Result<()> {
        self.stop_spinner()?;

        if self.is_terminal {
            self.update(content)?;
            println!();
        } else {
            println!("{content}");
        }

        println!();
        std::io::stdout().flush()?;

        Ok(())
    }

    fn stop_spinner(&mut self) -> Result<()> {
        if let Some(mut spinner) = self.spinner.take() {
            spinner.stop();
            crossterm::execute!(
                std::io::stdout(),
                crossterm::cursor::MoveToColumn(0),
                crossterm::terminal::Clear(crossterm::terminal::ClearType::CurrentLine)
            )?;
        }

        Ok(())
    }
}

/// The part of `content` to print after rewinding to the start of the cursor's line.
///
/// The cursor sits on the last `\n`-separated segment of `previous`, which is an empty line when
/// `previous` ends with a line break. Every segment before it stays on screen.
fn unprinted_lines<'a>(previous: &str, content: &'a str) -> &'a str {
    let printed = previous.split('\n').count() - 1;

    if printed == 0 {
        return content;
    }

    match content.match_indices('\n').nth(printed - 1) {
        Some((index, _)) => &content[index + 1..],
        None => "",
    }
}

/// Prints a whole message with its role label. Line breaks are kept as they are.
pub fn print_message(message: &Message) {
    print_label(message.role);
    println!("{}", message.content);
    println!();
}

/// Prints the role label that precedes a streaming reply.
pub fn print_label(role: Role) {
    println!("[{role}]");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_prints_everything() {
        assert_eq!(unprinted_lines("", "Hello\nWorld"), "Hello\nWorld");
    }

    #[test]
    fn test_last_line_is_rewritten() {
        assert_eq!(unprinted_lines("CS101 is a", "CS101 is a great"), "CS101 is a great");
        assert_eq!(
            unprinted_lines("It is fun. \n\nIt", "It is fun. \n\nIt is hard."),
            "It is hard."
        );
    }

    #[test]
    fn test_trailing_line_break_is_not_printed_twice() {
        assert_eq!(unprinted_lines("Hello\n", "Hello\nWorld"), "World");
        assert_eq!(unprinted_lines("Hello\n\n", "Hello\n\nWorld"), "World");
    }

    #[test]
    fn test_line_break_inserted_into_the_last_line() {
        assert_eq!(
            unprinted_lines("a great 1", "a great \n1. \n\nintro"),
            "a great \n1. \n\nintro"
        );
    }
}
