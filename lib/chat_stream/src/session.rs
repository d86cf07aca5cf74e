//! The turn state machine.
//!
//! A [`Session`] owns the transcript and walks every turn through
//! `Idle -> Sending -> Streaming -> Completed -> Idle`. A failure while sending or streaming goes
//! through `Errored` back to `Idle`. Only one turn is active at a time.
//!
//! The transitions are exposed as plain synchronous steps ([`Session::begin`],
//! [`Session::stream_opened`], [`Session::receive`], [`Session::complete`], [`Session::fail`]) so
//! an event loop can drive them itself. [`Session::submit`] runs a whole turn against a
//! [`Dispatcher`].
use futures::StreamExt;

use crate::client::Dispatcher;
use crate::decoder::{ChunkDecoder, DecodeArtifact};
use crate::error::{Error, Result};
use crate::format::format;
use crate::transcript::Transcript;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Sending,
    Streaming,
    Completed,
    Errored,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Idle => write!(f, "idle"),
            Status::Sending => write!(f, "sending"),
            Status::Streaming => write!(f, "streaming"),
            Status::Completed => write!(f, "completed"),
            Status::Errored => write!(f, "errored"),
        }
    }
}

impl Status {
    fn can_become(self, next: Status) -> bool {
        matches!(
            (self, next),
            (Status::Idle, Status::Sending)
                | (Status::Sending, Status::Streaming)
                | (Status::Sending, Status::Errored)
                | (Status::Streaming, Status::Completed)
                | (Status::Streaming, Status::Errored)
                | (Status::Completed, Status::Idle)
                | (Status::Errored, Status::Idle)
        )
    }
}

/// The result of a turn that streamed to its natural end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Final, formatted content of the assistant message.
    pub content: String,
    /// Set when the stream ended in the middle of a character.
    pub artifact: Option<DecodeArtifact>,
}

/// In-flight reply state. Formatting always runs over the raw text, never over earlier output.
#[derive(Debug, Default)]
struct Turn {
    decoder: ChunkDecoder,
    raw: String,
}

#[derive(Debug)]
pub struct Session<D> {
    dispatcher: D,
    transcript: Transcript,
    status: Status,
    turn: Option<Turn>,
}

impl<D> Session<D> {
    #[must_use]
    pub fn new(dispatcher: D, transcript: Transcript) -> Self {
        Self {
            dispatcher,
            transcript,
            status: Status::Idle,
            turn: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Starts a turn: appends the user message and an empty assistant placeholder.
    pub fn begin(&mut self, text: &str) -> Result<()> {
        if self.status != Status::Idle {
            return Err(Error::TurnInProgress(self.status));
        }

        if text.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }

        self.transition(Status::Sending)?;
        self.transcript.append_turn_start(text);
        self.turn = Some(Turn::default());

        Ok(())
    }

    /// The reply stream is open; fragments may now be received.
    pub fn stream_opened(&mut self) -> Result<()> {
        self.transition(Status::Streaming)
    }

    /// Decodes a fragment, re-formats the whole reply so far and rewrites the tail with it.
    pub fn receive(&mut self, fragment: &[u8]) -> Result<()> {
        let turn = match (self.status, self.turn.as_mut()) {
            (Status::Streaming, Some(turn)) => turn,
            (status, _) => return Err(Error::UnexpectedFragment(status)),
        };

        log::trace!("fragment: {} bytes", fragment.len());

        let text = turn.decoder.decode(fragment);
        turn.raw.push_str(&text);
        self.transcript.overwrite_tail(format(&turn.raw));

        Ok(())
    }

    /// The stream ended normally. The tail is frozen and the session is idle again.
    pub fn complete(&mut self) -> Result<Completion> {
        self.transition(Status::Completed)?;

        let artifact = self.turn.take().and_then(|turn| turn.decoder.finish());
        let content = self
            .transcript
            .tail()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        self.transition(Status::Idle)?;

        Ok(Completion { content, artifact })
    }

    /// The turn failed while sending or streaming. Whatever reached the tail stays there.
    pub fn fail(&mut self) -> Result<()> {
        self.transition(Status::Errored)?;
        self.turn = None;
        self.transition(Status::Idle)
    }

    /// Stops tracking the current turn without reading the rest of its stream.
    ///
    /// The tail keeps whatever content it had. Does nothing when idle.
    pub fn abandon(&mut self) {
        if self.status != Status::Idle {
            log::info!("abandoning turn while {}", self.status);
        }

        self.turn = None;
        self.status = Status::Idle;
    }

    fn transition(&mut self, next: Status) -> Result<()> {
        if !self.status.can_become(next) {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        log::debug!("status: {} -> {}", self.status, next);
        self.status = next;

        Ok(())
    }
}

impl<D: Dispatcher> Session<D> {
    /// Runs a full turn for `text`.
    ///
    /// `on_update` is called once the turn has started and again after every tail rewrite, so a
    /// view can re-render from [`Transcript::snapshot`]. Transport failures return the session to
    /// `Idle` with the partial reply kept in the tail, and are then returned to the caller.
    pub async fn submit<F>(&mut self, text: &str, mut on_update: F) -> Result<Completion>
    where
        F: FnMut(&Transcript),
    {
        self.begin(text)?;
        on_update(&self.transcript);

        let opened = self.dispatcher.open(self.transcript.without_tail()).await;
        let mut stream = match opened {
            Ok(stream) => stream,
            Err(e) => {
                self.fail()?;
                return Err(e.into());
            }
        };

        self.stream_opened()?;

        while let Some(fragment) = stream.next().await {
            match fragment {
                Ok(bytes) => {
                    self.receive(&bytes)?;
                    on_update(&self.transcript);
                }
                Err(e) => {
                    self.fail()?;
                    return Err(e.into());
                }
            }
        }

        self.complete()
    }
}
