//! A small engine that streams an assistant reply into a live conversation transcript.
//!
//! The engine is built from five pieces:
//!
//! - [`format()`] rewrites accumulated reply text into readable paragraphs and lists.
//! - [`ChunkDecoder`] turns raw byte fragments into text, even when a fragment ends in the
//!   middle of a multi-byte character.
//! - [`Transcript`] is the ordered log of messages. Only its tail is ever rewritten.
//! - [`Session`] consumes the byte stream and keeps the transcript current, one fragment at a
//!   time.
//! - [`Client`] serializes the history and opens the byte stream against the remote endpoint.
pub mod client;
pub mod decoder;
pub mod error;
pub mod format;
pub mod message;
pub mod session;
pub mod transcript;

pub use client::{ByteStream, Client, Dispatcher};
pub use decoder::{ChunkDecoder, DecodeArtifact};
pub use error::{Error, Result, TransportError};
pub use format::format;
pub use message::{Message, Role};
pub use session::{Completion, Session, Status};
pub use transcript::{Transcript, DEFAULT_GREETING};
