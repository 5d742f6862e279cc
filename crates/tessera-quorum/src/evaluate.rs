//! Synchronous quorum counting.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use tessera_core::{WitnessConfig, WitnessId};
use tessera_kel::Event;

use crate::error::QuorumError;
use crate::receipt::WitnessReceipt;

// ---------------------------------------------------------------------------
// QuorumResult
// ---------------------------------------------------------------------------

/// Outcome of counting witness receipts for one event.
///
/// A shortfall is not an error: `satisfied = false` with the partial
/// count attached, so callers can retry with backoff as receipts
/// propagate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumResult {
    pub satisfied: bool,
    /// Distinct recognized witnesses with a matching receipt.
    pub received: u32,
    pub threshold: u32,
    /// The witnesses that counted.
    pub witnesses: BTreeSet<WitnessId>,
    /// Receipts discarded because the witness is not in the recognized
    /// pool. A warning, not duplicity evidence on its own.
    pub unrecognized: Vec<WitnessId>,
    /// Receipts discarded because they attest a different digest or
    /// sequence than the event under evaluation.
    pub mismatched: u32,
    /// Extra receipts from witnesses already counted.
    pub duplicates: u32,
    /// True when the threshold is zero: structurally satisfied, but no
    /// consensus was actually required. Callers surface this as a
    /// design-level warning.
    pub trivial: bool,
}

/// Count receipts for `event` against the declared witness config.
///
/// Filtering, in order: digest/sequence match, recognized witness,
/// dedup by witness id. A witness attesting twice counts once.
pub fn evaluate(
    event: &Event,
    receipts: &[WitnessReceipt],
    config: &WitnessConfig,
) -> Result<QuorumResult, QuorumError> {
    config.validate()?;

    let mut witnesses: BTreeSet<WitnessId> = BTreeSet::new();
    let mut unrecognized = Vec::new();
    let mut mismatched = 0u32;
    let mut duplicates = 0u32;

    for receipt in receipts {
        if receipt.event_digest != event.digest || receipt.sequence != event.sequence {
            tracing::debug!(
                witness = %receipt.witness,
                receipt_digest = %receipt.event_digest,
                event_digest = %event.digest,
                "receipt does not match the event under evaluation"
            );
            mismatched += 1;
            continue;
        }
        if !config.recognizes(&receipt.witness) {
            tracing::warn!(
                witness = %receipt.witness,
                identifier = %event.owner,
                "receipt from unrecognized witness discarded"
            );
            unrecognized.push(receipt.witness.clone());
            continue;
        }
        if !witnesses.insert(receipt.witness.clone()) {
            duplicates += 1;
        }
    }

    let received = witnesses.len() as u32;
    let trivial = config.is_trivial();
    if trivial {
        tracing::warn!(
            identifier = %event.owner,
            "witness threshold is zero; no consensus is being required"
        );
    }

    Ok(QuorumResult {
        satisfied: received >= config.threshold,
        received,
        threshold: config.threshold,
        witnesses,
        unrecognized,
        mismatched,
        duplicates,
        trivial,
    })
}
