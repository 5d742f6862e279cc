//! Caller-supplied trust policy.
//!
//! Everything the engine must know about counterparties arrives here,
//! explicitly, per verifier instance — never through module-level
//! registries — so one process can serve multiple trust policies
//! concurrently.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use tessera_core::{CoreResult, IdentifierId, WitnessConfig, WitnessId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustPolicy {
    /// Fallback witness configuration for identifiers whose logs
    /// declare none.
    #[serde(default)]
    pub witness_config: Option<WitnessConfig>,

    /// Verifying keys of known witnesses. Receipts from these witnesses
    /// must carry a signature that verifies; witnesses without a known
    /// key pass through unscreened.
    #[serde(default)]
    pub witness_keys: BTreeMap<WitnessId, [u8; 32]>,

    /// Issuers accepted as credential chain roots. Empty accepts any
    /// root, downgraded to a warning.
    #[serde(default)]
    pub trusted_roots: BTreeSet<IdentifierId>,
}

impl TrustPolicy {
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(config) = &self.witness_config {
            config.validate()?;
        }
        Ok(())
    }

    pub fn trusts_root(&self, issuer: &IdentifierId) -> bool {
        self.trusted_roots.contains(issuer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(TrustPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_fallback_config_rejected() {
        let policy = TrustPolicy {
            witness_config: Some(WitnessConfig::new([WitnessId::new("BW1")], 3)),
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_trusts_root() {
        let policy = TrustPolicy {
            trusted_roots: [IdentifierId::new("ERoot")].into_iter().collect(),
            ..Default::default()
        };
        assert!(policy.trusts_root(&IdentifierId::new("ERoot")));
        assert!(!policy.trusts_root(&IdentifierId::new("EOther")));
    }
}
