//! Event log loading and structural validation.
//!
//! `EventLog::load` is the single gate between raw upstream records and
//! the typed model. Invariants checked here, in order, per event:
//!
//! 1. sequences contiguous from 0
//! 2. prior digest chains to the preceding event's digest
//! 3. sequence 0 is an inception kind; later sequences are not
//! 4. delegator present iff delegated inception
//! 5. anchors on interaction events only
//! 6. witness declarations on establishment events only, threshold
//!    accompanying the set
//! 7. digests non-empty and unique within the log
//!
//! The first violation rejects the whole log, citing the offending
//! sequence position.

use std::collections::HashSet;

use tessera_core::{EventDigest, IdentifierId, WitnessConfig, WitnessId};

use crate::error::{KelError, KelResult};
use crate::event::{Event, EventKind, RawEvent, Seal};

// ---------------------------------------------------------------------------
// EventLog — validated append-only event history of one identifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    identifier: IdentifierId,
    events: Vec<Event>,
}

impl EventLog {
    /// Validate raw events and promote them into a typed log.
    pub fn load(identifier: IdentifierId, raw_events: Vec<RawEvent>) -> KelResult<Self> {
        if raw_events.is_empty() {
            return Err(KelError::EmptyLog(identifier));
        }

        let mut events = Vec::with_capacity(raw_events.len());
        let mut seen_digests: HashSet<String> = HashSet::with_capacity(raw_events.len());

        for (position, raw) in raw_events.into_iter().enumerate() {
            let position = position as u64;
            let event = promote(&identifier, position, raw, events.last(), &mut seen_digests)?;
            events.push(event);
        }

        tracing::debug!(
            identifier = %identifier,
            events = events.len(),
            "loaded event log"
        );

        Ok(Self { identifier, events })
    }

    pub fn identifier(&self) -> &IdentifierId {
        &self.identifier
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event_at(&self, sequence: u64) -> KelResult<&Event> {
        self.events
            .get(sequence as usize)
            .ok_or_else(|| KelError::NotFound {
                identifier: self.identifier.clone(),
                sequence,
            })
    }

    /// The most recent event. Total: empty logs are rejected at load.
    pub fn latest(&self) -> &Event {
        self.events.last().expect("load rejects empty logs")
    }

    /// The founding event at sequence 0.
    pub fn inception(&self) -> &Event {
        self.events.first().expect("load rejects empty logs")
    }

    /// The controlling identifier, if this log was founded by a
    /// delegated inception.
    pub fn delegator(&self) -> Option<&IdentifierId> {
        self.inception().delegator.as_ref()
    }

    pub fn is_delegated(&self) -> bool {
        self.delegator().is_some()
    }

    /// The witness configuration currently in force: the declaration on
    /// the most recent establishment event that carried one.
    pub fn witness_config(&self) -> Option<WitnessConfig> {
        self.events
            .iter()
            .rev()
            .filter(|e| e.is_establishment())
            .find_map(|e| {
                let witnesses = e.witnesses.as_ref()?;
                let threshold = e.witness_threshold?;
                Some(WitnessConfig::new(witnesses.iter().cloned(), threshold))
            })
    }
}

/// Validate one raw event against its expected position and predecessor.
fn promote(
    identifier: &IdentifierId,
    position: u64,
    raw: RawEvent,
    prior: Option<&Event>,
    seen_digests: &mut HashSet<String>,
) -> KelResult<Event> {
    if raw.sequence != position {
        return Err(KelError::malformed(
            position,
            format!("expected sequence {}, found {}", position, raw.sequence),
        ));
    }

    if raw.digest.is_empty() {
        return Err(KelError::malformed(position, "event digest is empty"));
    }
    if !seen_digests.insert(raw.digest.clone()) {
        return Err(KelError::malformed(
            position,
            format!("digest {} already appears earlier in the log", raw.digest),
        ));
    }

    // Normalize: an empty prior digest string means "no prior".
    let prior_digest = raw.prior_digest.filter(|d| !d.is_empty());

    match (position, prior) {
        (0, _) => {
            if !raw.kind.is_inception() {
                return Err(KelError::malformed(
                    0,
                    format!("sequence 0 must be an inception event, found {}", raw.kind),
                ));
            }
            if prior_digest.is_some() {
                return Err(KelError::malformed(
                    0,
                    "inception event must not carry a prior digest",
                ));
            }
        }
        (_, Some(prev)) => {
            if raw.kind.is_inception() {
                return Err(KelError::malformed(
                    position,
                    format!("{} event only valid at sequence 0", raw.kind),
                ));
            }
            match &prior_digest {
                None => {
                    return Err(KelError::malformed(
                        position,
                        "prior digest missing above sequence 0",
                    ))
                }
                Some(d) if *d != prev.digest.0 => {
                    return Err(KelError::malformed(
                        position,
                        format!(
                            "prior digest {} does not match digest {} of sequence {}",
                            d, prev.digest, prev.sequence
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
        (_, None) => unreachable!("non-zero position implies a predecessor"),
    }

    let delegator = match (raw.kind, raw.delegator) {
        (EventKind::DelegatedInception, Some(d)) if !d.is_empty() => Some(IdentifierId::new(d)),
        (EventKind::DelegatedInception, _) => {
            return Err(KelError::malformed(
                position,
                "delegated inception missing its delegator",
            ))
        }
        (kind, Some(d)) if !d.is_empty() => {
            return Err(KelError::malformed(
                position,
                format!("{} event must not name a delegator ({})", kind, d),
            ))
        }
        (_, _) => None,
    };

    if !raw.anchors.is_empty() && raw.kind != EventKind::Interaction {
        return Err(KelError::malformed(
            position,
            format!("anchors only valid on interaction events, found on {}", raw.kind),
        ));
    }
    let anchors = raw
        .anchors
        .into_iter()
        .map(|s| Seal {
            target: IdentifierId::new(s.target),
            target_sequence: s.target_sequence,
            target_digest: EventDigest::new(s.target_digest),
        })
        .collect();

    if (raw.witnesses.is_some() || raw.witness_threshold.is_some())
        && !raw.kind.is_establishment()
    {
        return Err(KelError::malformed(
            position,
            format!("witness declaration only valid on establishment events, found on {}", raw.kind),
        ));
    }
    if raw.witnesses.is_some() && raw.witness_threshold.is_none() {
        return Err(KelError::malformed(
            position,
            "witness set declared without a threshold",
        ));
    }
    let witnesses = raw
        .witnesses
        .map(|ws| ws.into_iter().map(WitnessId::new).collect::<Vec<_>>());

    Ok(Event {
        owner: identifier.clone(),
        sequence: raw.sequence,
        kind: raw.kind,
        digest: EventDigest::new(raw.digest),
        prior_digest: prior_digest.map(EventDigest::new),
        delegator,
        anchors,
        witnesses,
        witness_threshold: raw.witness_threshold,
    })
}

// ---------------------------------------------------------------------------
// LogSource — the read-only collaborator contract for event histories
// ---------------------------------------------------------------------------

/// How the engine obtains raw event logs. The engine never writes,
/// retries, or caches; it just asks.
pub trait LogSource: Send + Sync {
    /// Ordered raw events for one identifier.
    fn fetch_log(&self, identifier: &IdentifierId) -> KelResult<Vec<RawEvent>>;
}
