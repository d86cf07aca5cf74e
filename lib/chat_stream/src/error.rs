use crate::session::Status;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures talking to the remote endpoint. They end the current turn but never the session.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(Box<dyn std::error::Error + Send + Sync>),
    #[error("endpoint responded with status {status}: {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    pub(crate) fn network(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Network(Box::new(err))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("a turn is already in progress ({0})")]
    TurnInProgress(Status),
    #[error("can't submit an empty message")]
    EmptyMessage,
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },
    #[error("received a stream fragment while {0}")]
    UnexpectedFragment(Status),
}
