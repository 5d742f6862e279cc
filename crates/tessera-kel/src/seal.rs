//! Delegation seal matching and validation.
//!
//! A delegation is approved when the delegator's log contains an
//! interaction event anchoring the delegate's event: matching target
//! identifier, target sequence, and target digest. The digest equality
//! is the cryptographic proof — any mismatch means forgery, an
//! incomplete delegation handshake, or a corrupted log view, and is a
//! hard failure. The identifier and sequence checks are structural.
//!
//! When several interaction events anchor the same (target, sequence),
//! the earliest is authoritative; append-only log semantics make it the
//! operative one. Later duplicates are reported, not fatal — but a
//! duplicate carrying a different digest is flagged as conflicting so
//! callers can escalate to duplicity handling.

use serde::{Deserialize, Serialize};
use tessera_core::{EventDigest, IdentifierId};

use crate::error::{KelError, KelResult};
use crate::event::{Event, EventKind, Seal};
use crate::log::EventLog;

// ---------------------------------------------------------------------------
// SealMatch — result of scanning a delegator log for an anchor
// ---------------------------------------------------------------------------

/// A later interaction event anchoring the same (target, sequence) as
/// the authoritative seal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateSeal {
    /// Sequence of the delegator event carrying the duplicate anchor.
    pub anchored_at: u64,
    pub digest: EventDigest,
    /// True when the duplicate claims a different digest than the
    /// authoritative seal — possible duplicity evidence.
    pub conflicting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealMatch {
    /// The authoritative (earliest) seal.
    pub seal: Seal,
    /// Sequence of the delegator event that carries it.
    pub anchored_at: u64,
    /// Later anchors for the same (target, sequence). Warnings, not errors.
    pub duplicates: Vec<DuplicateSeal>,
}

/// Scan the delegator's interaction events for an anchor of
/// `delegate`'s event at `delegate_sequence`.
pub fn find_seal(
    delegator_log: &EventLog,
    delegate: &IdentifierId,
    delegate_sequence: u64,
) -> KelResult<SealMatch> {
    let mut found: Option<SealMatch> = None;

    for event in delegator_log.events() {
        if event.kind != EventKind::Interaction {
            continue;
        }
        for anchor in &event.anchors {
            if anchor.target != *delegate || anchor.target_sequence != delegate_sequence {
                continue;
            }
            if let Some(m) = found.as_mut() {
                let conflicting = anchor.target_digest != m.seal.target_digest;
                tracing::warn!(
                    delegate = %delegate,
                    sequence = delegate_sequence,
                    first_at = m.anchored_at,
                    duplicate_at = event.sequence,
                    conflicting,
                    "duplicate delegation anchor; earliest remains authoritative"
                );
                m.duplicates.push(DuplicateSeal {
                    anchored_at: event.sequence,
                    digest: anchor.target_digest.clone(),
                    conflicting,
                });
            } else {
                found = Some(SealMatch {
                    seal: anchor.clone(),
                    anchored_at: event.sequence,
                    duplicates: vec![],
                });
            }
        }
    }

    found.ok_or_else(|| KelError::SealNotFound {
        delegate: delegate.clone(),
        sequence: delegate_sequence,
    })
}

// ---------------------------------------------------------------------------
// SealValidation — three independent checks, all must pass
// ---------------------------------------------------------------------------

/// Outcome of validating a seal against the delegate event it claims to
/// approve. Carries the literal values of both sides of every check so
/// callers can display the exact mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealValidation {
    pub identifier_match: bool,
    pub sequence_match: bool,
    /// The cryptographic proof. A mismatch is a hard failure, never a
    /// warning.
    pub digest_match: bool,

    /// The delegate event's owner, verbatim.
    pub event_owner: IdentifierId,
    /// The identifier the seal targets, verbatim.
    pub seal_target: IdentifierId,
    pub event_sequence: u64,
    pub seal_sequence: u64,
    /// The delegate event's own digest, verbatim.
    pub event_digest: EventDigest,
    /// The digest the seal attests, verbatim.
    pub seal_digest: EventDigest,
}

impl SealValidation {
    pub fn is_valid(&self) -> bool {
        self.identifier_match && self.sequence_match && self.digest_match
    }
}

/// Validate a seal against the delegate event it should approve.
///
/// Deterministic and idempotent: the same pair always yields the same
/// result.
pub fn validate_seal(delegate_event: &Event, seal: &Seal) -> SealValidation {
    let validation = SealValidation {
        identifier_match: seal.target == delegate_event.owner,
        sequence_match: seal.target_sequence == delegate_event.sequence,
        digest_match: seal.target_digest == delegate_event.digest,
        event_owner: delegate_event.owner.clone(),
        seal_target: seal.target.clone(),
        event_sequence: delegate_event.sequence,
        seal_sequence: seal.target_sequence,
        event_digest: delegate_event.digest.clone(),
        seal_digest: seal.target_digest.clone(),
    };

    if !validation.digest_match {
        tracing::warn!(
            event_digest = %validation.event_digest,
            seal_digest = %validation.seal_digest,
            "seal digest mismatch"
        );
    }

    validation
}
