use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("witness threshold {threshold} exceeds pool of {pool_size} witnesses")]
    InvalidWitnessConfig { threshold: u32, pool_size: usize },

    #[error("malformed digest: {0}")]
    MalformedDigest(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_witness_config_display() {
        let err = CoreError::InvalidWitnessConfig {
            threshold: 4,
            pool_size: 3,
        };
        assert_eq!(
            err.to_string(),
            "witness threshold 4 exceeds pool of 3 witnesses"
        );
    }
}
