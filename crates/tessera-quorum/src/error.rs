use tessera_core::CoreError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuorumError {
    /// The witness configuration is structurally invalid
    /// (threshold exceeds the pool). Caught before any counting.
    #[error("invalid witness configuration: {0}")]
    InvalidConfig(#[from] CoreError),

    #[error("invalid collection policy: {0}")]
    InvalidPolicy(String),

    /// Receipt source query failed. Retry/backoff is the caller's concern.
    #[error("receipt source unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps_core() {
        let err: QuorumError = CoreError::InvalidWitnessConfig {
            threshold: 5,
            pool_size: 2,
        }
        .into();
        assert!(err.to_string().contains("threshold 5"));
    }
}
