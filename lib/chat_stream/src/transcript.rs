use serde::Serialize;

use crate::message::Message;

/// Greeting used to seed a new transcript.
pub const DEFAULT_GREETING: &str =
    "Hi! I'm the Rate My Professor support assistant. How can I help you today?";

/// Ordered conversation log.
///
/// Messages are only ever appended. The single exception is the tail, whose content is rewritten
/// in place while its reply is streaming. The log is seeded with an assistant greeting, so it is
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

impl Transcript {
    /// Creates a transcript holding a single assistant greeting.
    #[must_use]
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
        }
    }

    /// Appends the user message followed by an empty assistant placeholder, which becomes the
    /// tail.
    pub fn append_turn_start(&mut self, user_text: impl Into<String>) {
        self.messages.push(Message::user(user_text));
        self.messages.push(Message::assistant(String::new()));
    }

    /// Replaces the content of the tail. Role, position and every earlier message are untouched.
    pub fn overwrite_tail(&mut self, content: impl Into<String>) {
        if let Some(tail) = self.messages.last_mut() {
            tail.content = content.into();
        }
    }

    /// The ordered messages, for rendering.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn tail(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Every message except the tail: the history sent with a new turn, without its placeholder.
    pub fn without_tail(&self) -> &[Message] {
        match self.messages.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
