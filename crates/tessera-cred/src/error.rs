use tessera_core::CredentialId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredError {
    #[error("credential {0} not found")]
    CredentialNotFound(CredentialId),

    #[error("malformed credential {credential}: {reason}")]
    MalformedCredential {
        credential: CredentialId,
        reason: String,
    },

    /// The walk never reached a root: every route from the leaf loops
    /// back into the graph. Fatal — no amount of waiting fixes a
    /// malformed graph.
    #[error("credential graph reachable from {0} contains a cycle")]
    GraphCycle(CredentialId),

    /// Collaborator query failed. Retry/backoff is the caller's concern.
    #[error("credential source unavailable: {0}")]
    Unavailable(String),
}

pub type CredResult<T> = Result<T, CredError>;
