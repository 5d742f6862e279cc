use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// The caller-supplied trust policy is structurally invalid.
    /// Caught at construction, before any verification runs.
    #[error("invalid trust policy: {0}")]
    InvalidPolicy(#[from] tessera_core::CoreError),
}

pub type VerifyResult<T> = Result<T, VerifyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::CoreError;

    #[test]
    fn test_invalid_policy_display() {
        let err: VerifyError = CoreError::InvalidWitnessConfig {
            threshold: 9,
            pool_size: 1,
        }
        .into();
        assert!(err.to_string().starts_with("invalid trust policy"));
    }
}
