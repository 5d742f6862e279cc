use serde::{Deserialize, Serialize};
use std::fmt;
use tessera_core::{EventDigest, IdentifierId, WitnessId};

// ---------------------------------------------------------------------------
// EventKind — the four event types, with their wire names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Founding event of a plain identifier.
    #[serde(rename = "icp")]
    Inception,
    /// Founding event that names a controlling delegator identifier.
    #[serde(rename = "dip")]
    DelegatedInception,
    /// Key rotation. May re-declare the witness set.
    #[serde(rename = "rot")]
    Rotation,
    /// Interaction event. The only kind that carries anchors.
    #[serde(rename = "ixn")]
    Interaction,
}

impl EventKind {
    /// Establishment events found or evolve control; they may declare
    /// a witness set.
    pub fn is_establishment(&self) -> bool {
        matches!(
            self,
            EventKind::Inception | EventKind::DelegatedInception | EventKind::Rotation
        )
    }

    pub fn is_inception(&self) -> bool {
        matches!(self, EventKind::Inception | EventKind::DelegatedInception)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Inception => write!(f, "icp"),
            EventKind::DelegatedInception => write!(f, "dip"),
            EventKind::Rotation => write!(f, "rot"),
            EventKind::Interaction => write!(f, "ixn"),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw records — lenient serde forms, promoted to strict types at load
// ---------------------------------------------------------------------------

/// One anchor as it appears in a raw interaction event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSeal {
    pub target: String,
    pub target_sequence: u64,
    pub target_digest: String,
}

/// One entry of a raw event log, before structural validation.
///
/// Every optional field defaults so that loosely produced upstream
/// records decode; the strict checks happen in `EventLog::load`, not
/// in serde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub sequence: u64,
    pub kind: EventKind,
    pub digest: String,
    #[serde(default)]
    pub prior_digest: Option<String>,
    #[serde(default)]
    pub delegator: Option<String>,
    #[serde(default)]
    pub anchors: Vec<RawSeal>,
    #[serde(default)]
    pub witnesses: Option<Vec<String>>,
    #[serde(default)]
    pub witness_threshold: Option<u32>,
}

// ---------------------------------------------------------------------------
// Seal — a claim embedded in an interaction event
// ---------------------------------------------------------------------------

/// "I attest that identifier `target`'s event at `target_sequence` has
/// digest `target_digest`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seal {
    pub target: IdentifierId,
    pub target_sequence: u64,
    pub target_digest: EventDigest,
}

// ---------------------------------------------------------------------------
// Event — one validated entry in an identifier's log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The identifier whose log this event belongs to.
    pub owner: IdentifierId,
    pub sequence: u64,
    pub kind: EventKind,
    pub digest: EventDigest,
    /// Digest of the immediately preceding event. None only at sequence 0.
    pub prior_digest: Option<EventDigest>,
    /// The controlling identifier. Some iff kind is DelegatedInception.
    pub delegator: Option<IdentifierId>,
    /// Anchors approving external events. Interaction events only.
    pub anchors: Vec<Seal>,
    /// Witness set declared by this event (establishment events only).
    pub witnesses: Option<Vec<WitnessId>>,
    pub witness_threshold: Option<u32>,
}

impl Event {
    pub fn is_establishment(&self) -> bool {
        self.kind.is_establishment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(serde_json::to_string(&EventKind::Inception).unwrap(), "\"icp\"");
        assert_eq!(
            serde_json::to_string(&EventKind::DelegatedInception).unwrap(),
            "\"dip\""
        );
        let kind: EventKind = serde_json::from_str("\"ixn\"").unwrap();
        assert_eq!(kind, EventKind::Interaction);
    }

    #[test]
    fn test_kind_classification() {
        assert!(EventKind::Rotation.is_establishment());
        assert!(!EventKind::Interaction.is_establishment());
        assert!(EventKind::DelegatedInception.is_inception());
        assert!(!EventKind::Rotation.is_inception());
    }

    #[test]
    fn test_raw_event_lenient_decode() {
        // Only the mandatory fields present; everything else defaults.
        let raw: RawEvent = serde_json::from_str(
            r#"{"sequence": 0, "kind": "icp", "digest": "ED0"}"#,
        )
        .unwrap();
        assert_eq!(raw.sequence, 0);
        assert!(raw.prior_digest.is_none());
        assert!(raw.anchors.is_empty());
        assert!(raw.witnesses.is_none());
    }

    #[test]
    fn test_raw_event_with_anchor_decode() {
        let raw: RawEvent = serde_json::from_str(
            r#"{
                "sequence": 2,
                "kind": "ixn",
                "digest": "ED2",
                "prior_digest": "ED1",
                "anchors": [
                    {"target": "EDel", "target_sequence": 0, "target_digest": "EDip"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(raw.anchors.len(), 1);
        assert_eq!(raw.anchors[0].target, "EDel");
    }
}
