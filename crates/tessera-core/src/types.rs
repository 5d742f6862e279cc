use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CoreError, CoreResult};

// ---------------------------------------------------------------------------
// Typed identifiers — prevent stringly-typed confusion
// ---------------------------------------------------------------------------

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

define_id!(
    IdentifierId,
    "Self-certifying identifier handle (AID). Opaque, immutable once assigned."
);
define_id!(
    WitnessId,
    "Identifier of an independent witness that receipts observed events."
);
define_id!(CredentialId, "Unique identifier for a credential.");
define_id!(SchemaId, "Identifier of a credential schema.");
define_id!(
    EventDigest,
    "Content-derived digest of one event. Compared exact-match only."
);

// ---------------------------------------------------------------------------
// Timestamp — canonical time representation (seconds + nanoseconds)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds_since_epoch: u64,
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn now() -> Self {
        let now = chrono::Utc::now();
        Self {
            seconds_since_epoch: now.timestamp() as u64,
            nanoseconds: now.timestamp_subsec_nanos(),
        }
    }

    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            seconds_since_epoch: seconds,
            nanoseconds: 0,
        }
    }

    pub fn to_rfc3339(&self) -> String {
        let dt =
            chrono::DateTime::from_timestamp(self.seconds_since_epoch as i64, self.nanoseconds);
        dt.map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "invalid".to_string())
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Timestamp {
    fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            seconds_since_epoch: dt.timestamp() as u64,
            nanoseconds: dt.timestamp_subsec_nanos(),
        }
    }
}

// ---------------------------------------------------------------------------
// WitnessConfig — declared witness pool and receipt threshold
// ---------------------------------------------------------------------------

/// Declares how many distinct witness receipts are required before an
/// event is considered confirmed, and which witnesses are recognized.
///
/// `threshold > |witnesses|` is a configuration error, never a runtime
/// failure: it is caught by `validate()` before any counting happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessConfig {
    /// The recognized witness pool. Receipts from anyone else are discarded.
    pub witnesses: BTreeSet<WitnessId>,
    /// Minimum count of distinct valid receipts required.
    pub threshold: u32,
}

impl WitnessConfig {
    pub fn new(witnesses: impl IntoIterator<Item = WitnessId>, threshold: u32) -> Self {
        Self {
            witnesses: witnesses.into_iter().collect(),
            threshold,
        }
    }

    /// Check the structural invariant `threshold <= |witnesses|`.
    pub fn validate(&self) -> CoreResult<()> {
        if self.threshold as usize > self.witnesses.len() {
            return Err(CoreError::InvalidWitnessConfig {
                threshold: self.threshold,
                pool_size: self.witnesses.len(),
            });
        }
        Ok(())
    }

    /// A zero threshold is structurally valid but means no consensus is
    /// being required. Callers surface this as a design-level warning.
    pub fn is_trivial(&self) -> bool {
        self.threshold == 0
    }

    pub fn recognizes(&self, witness: &WitnessId) -> bool {
        self.witnesses.contains(witness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_ids_distinct() {
        let aid = IdentifierId::new("EAbc");
        let wid = WitnessId::new("BWit");
        assert_ne!(aid.as_str(), wid.as_str());
    }

    #[test]
    fn test_identifier_display() {
        let id = IdentifierId::new("EKk9v1p3aH5Z");
        assert_eq!(format!("{}", id), "EKk9v1p3aH5Z");
    }

    #[test]
    fn test_digest_exact_equality() {
        let d1 = EventDigest::new("ED1");
        let d2 = EventDigest::new("ED1");
        let d3 = EventDigest::new("ED2");
        assert_eq!(d1, d2);
        assert_ne!(d1, d3);
    }

    #[test]
    fn test_timestamp_ordering() {
        let t1 = Timestamp::from_seconds(100);
        let t2 = Timestamp::from_seconds(200);
        assert!(t1 < t2);
    }

    #[test]
    fn test_timestamp_rfc3339() {
        let t = Timestamp::from_seconds(1_700_000_000);
        assert!(t.to_rfc3339().contains("2023"));
    }

    #[test]
    fn test_witness_config_valid() {
        let config = WitnessConfig::new(
            (1..=6).map(|i| WitnessId::new(format!("BW{}", i))),
            3,
        );
        assert!(config.validate().is_ok());
        assert!(!config.is_trivial());
    }

    #[test]
    fn test_witness_config_threshold_exceeds_pool() {
        let config = WitnessConfig::new([WitnessId::new("BW1")], 2);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidWitnessConfig {
                threshold: 2,
                pool_size: 1
            }
        ));
    }

    #[test]
    fn test_witness_config_zero_threshold_is_trivial() {
        let config = WitnessConfig::new([WitnessId::new("BW1")], 0);
        assert!(config.validate().is_ok());
        assert!(config.is_trivial());
    }

    #[test]
    fn test_witness_config_recognizes() {
        let config = WitnessConfig::new([WitnessId::new("BW1")], 1);
        assert!(config.recognizes(&WitnessId::new("BW1")));
        assert!(!config.recognizes(&WitnessId::new("BW9")));
    }

    #[test]
    fn test_witness_config_serde_round_trip() {
        let config = WitnessConfig::new([WitnessId::new("BW1"), WitnessId::new("BW2")], 2);
        let json = serde_json::to_string(&config).unwrap();
        let back: WitnessConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
