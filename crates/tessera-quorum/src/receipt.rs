//! Witness receipts and signature screening.
//!
//! A receipt is one witness's attestation that it observed and
//! validated a given event. Receipts arrive pre-authenticated by the
//! transport layer; signature material is optional here. When the
//! caller supplies verifying keys for known witnesses, receipts from
//! those witnesses must carry a signature that verifies under the
//! injected primitive — screening happens before quorum counting, and
//! rejected receipts are reported, never silently dropped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use tessera_core::{EventDigest, IdentifierId, SignatureVerifier, WitnessId};

use crate::error::QuorumError;

// ---------------------------------------------------------------------------
// WitnessReceipt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessReceipt {
    pub witness: WitnessId,
    /// Digest of the event the witness observed.
    pub event_digest: EventDigest,
    pub sequence: u64,
    /// Hex-encoded signature over [`receipt_message`], if the transport
    /// passed it through.
    #[serde(default)]
    pub signature: Option<String>,
}

/// Canonical bytes a witness signs when receipting an event.
pub fn receipt_message(event_digest: &EventDigest, sequence: u64) -> Vec<u8> {
    format!("{}:{}", event_digest, sequence).into_bytes()
}

// ---------------------------------------------------------------------------
// ReceiptSource — the read-only collaborator contract for receipts
// ---------------------------------------------------------------------------

/// How the engine obtains already-collected receipts for an event.
/// Live gathering from the witness pool itself goes through the async
/// collector instead.
pub trait ReceiptSource: Send + Sync {
    fn fetch_receipts(
        &self,
        identifier: &IdentifierId,
        sequence: u64,
    ) -> Result<Vec<WitnessReceipt>, QuorumError>;
}

// ---------------------------------------------------------------------------
// Signature screening
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The witness has a known key but the receipt carries no signature.
    MissingSignature,
    /// The signature field is not valid hex.
    MalformedSignature,
    /// The signature does not verify under the witness's known key.
    BadSignature,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::MissingSignature => write!(f, "missing signature"),
            RejectionReason::MalformedSignature => write!(f, "malformed signature"),
            RejectionReason::BadSignature => write!(f, "signature does not verify"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedReceipt {
    pub receipt: WitnessReceipt,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptScreening {
    pub accepted: Vec<WitnessReceipt>,
    pub rejected: Vec<RejectedReceipt>,
}

/// Screen receipts against known witness keys.
///
/// Receipts from witnesses with a known key must carry a verifying
/// signature. Receipts from witnesses without a known key pass through
/// unchanged — the transport already authenticated them.
pub fn verify_receipt_signatures(
    receipts: Vec<WitnessReceipt>,
    keys: &BTreeMap<WitnessId, [u8; 32]>,
    verifier: &dyn SignatureVerifier,
) -> ReceiptScreening {
    let mut accepted = Vec::with_capacity(receipts.len());
    let mut rejected = Vec::new();

    for receipt in receipts {
        let Some(key) = keys.get(&receipt.witness) else {
            accepted.push(receipt);
            continue;
        };

        let reason = match &receipt.signature {
            None => Some(RejectionReason::MissingSignature),
            Some(sig_hex) => match hex::decode(sig_hex) {
                Err(_) => Some(RejectionReason::MalformedSignature),
                Ok(sig) => {
                    let message = receipt_message(&receipt.event_digest, receipt.sequence);
                    if verifier.verify(key, &message, &sig) {
                        None
                    } else {
                        Some(RejectionReason::BadSignature)
                    }
                }
            },
        };

        match reason {
            None => accepted.push(receipt),
            Some(reason) => {
                tracing::warn!(
                    witness = %receipt.witness,
                    %reason,
                    "rejecting witness receipt"
                );
                rejected.push(RejectedReceipt { receipt, reason });
            }
        }
    }

    ReceiptScreening { accepted, rejected }
}
