//! State consistency checking between two views of one identifier.
//!
//! Two independently obtained snapshots of the same log (say, a local
//! cache and a remote resolver) are compared on their latest sequence,
//! latest digest, and declared witness configuration. The comparison is
//! symmetric: every divergence carries both values, and this module
//! never decides which view is correct — that judgment belongs to the
//! caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use tessera_core::{EventDigest, IdentifierId, WitnessId};

use crate::error::{KelError, KelResult};
use crate::log::EventLog;

// ---------------------------------------------------------------------------
// Divergence — one field on which the views disagree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Divergence {
    LatestSequence {
        local: u64,
        remote: u64,
    },
    LatestDigest {
        local: EventDigest,
        remote: EventDigest,
    },
    WitnessSet {
        local: Option<BTreeSet<WitnessId>>,
        remote: Option<BTreeSet<WitnessId>>,
    },
    WitnessThreshold {
        local: Option<u32>,
        remote: Option<u32>,
    },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Divergence::LatestSequence { local, remote } => {
                write!(f, "latest sequence: local {} vs remote {}", local, remote)
            }
            Divergence::LatestDigest { local, remote } => {
                write!(f, "latest digest: local {} vs remote {}", local, remote)
            }
            Divergence::WitnessSet { local, remote } => {
                let render = |s: &Option<BTreeSet<WitnessId>>| match s {
                    None => "undeclared".to_string(),
                    Some(set) => {
                        let ids: Vec<&str> = set.iter().map(|w| w.as_str()).collect();
                        format!("{{{}}}", ids.join(", "))
                    }
                };
                write!(
                    f,
                    "witness set: local {} vs remote {}",
                    render(local),
                    render(remote)
                )
            }
            Divergence::WitnessThreshold { local, remote } => {
                let render = |t: &Option<u32>| match t {
                    None => "undeclared".to_string(),
                    Some(n) => n.to_string(),
                };
                write!(
                    f,
                    "witness threshold: local {} vs remote {}",
                    render(local),
                    render(remote)
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ConsistencyResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyResult {
    pub identifier: IdentifierId,
    pub divergences: Vec<Divergence>,
}

impl ConsistencyResult {
    pub fn is_consistent(&self) -> bool {
        self.divergences.is_empty()
    }
}

/// Compare two views of the same identifier's log.
///
/// Views of different identifiers are a caller error, not a divergence.
pub fn compare(local: &EventLog, remote: &EventLog) -> KelResult<ConsistencyResult> {
    if local.identifier() != remote.identifier() {
        return Err(KelError::IdentifierMismatch {
            local: local.identifier().clone(),
            remote: remote.identifier().clone(),
        });
    }

    let mut divergences = Vec::new();

    let local_latest = local.latest();
    let remote_latest = remote.latest();
    if local_latest.sequence != remote_latest.sequence {
        divergences.push(Divergence::LatestSequence {
            local: local_latest.sequence,
            remote: remote_latest.sequence,
        });
    }
    if local_latest.digest != remote_latest.digest {
        divergences.push(Divergence::LatestDigest {
            local: local_latest.digest.clone(),
            remote: remote_latest.digest.clone(),
        });
    }

    let local_config = local.witness_config();
    let remote_config = remote.witness_config();
    let local_set = local_config.as_ref().map(|c| c.witnesses.clone());
    let remote_set = remote_config.as_ref().map(|c| c.witnesses.clone());
    if local_set != remote_set {
        divergences.push(Divergence::WitnessSet {
            local: local_set,
            remote: remote_set,
        });
    }
    let local_threshold = local_config.as_ref().map(|c| c.threshold);
    let remote_threshold = remote_config.as_ref().map(|c| c.threshold);
    if local_threshold != remote_threshold {
        divergences.push(Divergence::WitnessThreshold {
            local: local_threshold,
            remote: remote_threshold,
        });
    }

    if !divergences.is_empty() {
        tracing::warn!(
            identifier = %local.identifier(),
            divergences = divergences.len(),
            "log views diverge"
        );
    }

    Ok(ConsistencyResult {
        identifier: local.identifier().clone(),
        divergences,
    })
}
