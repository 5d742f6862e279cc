use tessera_core::IdentifierId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KelError {
    /// Structural invariant violation. Always fatal to that log view;
    /// retrying never helps.
    #[error("malformed log at sequence {position}: {reason}")]
    MalformedLog { position: u64, reason: String },

    #[error("event log for {0} is empty")]
    EmptyLog(IdentifierId),

    #[error("no event at sequence {sequence} in log of {identifier}")]
    NotFound {
        identifier: IdentifierId,
        sequence: u64,
    },

    /// No interaction event in the delegator's log anchors the claimed
    /// delegate event. May reflect an incomplete delegation handshake;
    /// callers can legitimately retry after a delay.
    #[error("no delegation seal for {delegate} at sequence {sequence}")]
    SealNotFound {
        delegate: IdentifierId,
        sequence: u64,
    },

    #[error("views refer to different identifiers: {local} vs {remote}")]
    IdentifierMismatch {
        local: IdentifierId,
        remote: IdentifierId,
    },

    /// The collaborator has no log for this identifier.
    #[error("no event log known for {0}")]
    UnknownIdentifier(IdentifierId),

    /// Collaborator query failed. Retry/backoff is the caller's concern.
    #[error("log source unavailable: {0}")]
    Unavailable(String),
}

impl KelError {
    pub fn malformed(position: u64, reason: impl Into<String>) -> Self {
        Self::MalformedLog {
            position,
            reason: reason.into(),
        }
    }
}

pub type KelResult<T> = Result<T, KelError>;
