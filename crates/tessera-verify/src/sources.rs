//! In-memory collaborator sources, for tests and embedders that
//! already hold their data.

use std::collections::BTreeMap;
use std::sync::Mutex;

use tessera_core::{CredentialId, IdentifierId};
use tessera_cred::{CredError, Credential, CredentialSource};
use tessera_kel::{KelError, LogSource, RawEvent};
use tessera_quorum::{QuorumError, ReceiptSource, WitnessReceipt};

// ---------------------------------------------------------------------------
// InMemoryLogSource
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryLogSource {
    logs: Mutex<BTreeMap<IdentifierId, Vec<RawEvent>>>,
}

impl InMemoryLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, identifier: IdentifierId, events: Vec<RawEvent>) {
        self.logs
            .lock()
            .expect("log source lock poisoned")
            .insert(identifier, events);
    }
}

impl LogSource for InMemoryLogSource {
    fn fetch_log(&self, identifier: &IdentifierId) -> Result<Vec<RawEvent>, KelError> {
        self.logs
            .lock()
            .map_err(|_| KelError::Unavailable("log source lock poisoned".to_string()))?
            .get(identifier)
            .cloned()
            .ok_or_else(|| KelError::UnknownIdentifier(identifier.clone()))
    }
}

// ---------------------------------------------------------------------------
// InMemoryReceiptSource
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryReceiptSource {
    receipts: Mutex<BTreeMap<(IdentifierId, u64), Vec<WitnessReceipt>>>,
}

impl InMemoryReceiptSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, identifier: IdentifierId, sequence: u64, receipt: WitnessReceipt) {
        self.receipts
            .lock()
            .expect("receipt source lock poisoned")
            .entry((identifier, sequence))
            .or_default()
            .push(receipt);
    }
}

impl ReceiptSource for InMemoryReceiptSource {
    fn fetch_receipts(
        &self,
        identifier: &IdentifierId,
        sequence: u64,
    ) -> Result<Vec<WitnessReceipt>, QuorumError> {
        Ok(self
            .receipts
            .lock()
            .map_err(|_| QuorumError::Unavailable("receipt source lock poisoned".to_string()))?
            .get(&(identifier.clone(), sequence))
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// InMemoryCredentialSource
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryCredentialSource {
    credentials: Mutex<BTreeMap<CredentialId, Credential>>,
}

impl InMemoryCredentialSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, credential: Credential) {
        self.credentials
            .lock()
            .expect("credential source lock poisoned")
            .insert(credential.id.clone(), credential);
    }
}

impl CredentialSource for InMemoryCredentialSource {
    fn fetch_credential(&self, id: &CredentialId) -> Result<Credential, CredError> {
        self.credentials
            .lock()
            .map_err(|_| CredError::Unavailable("credential source lock poisoned".to_string()))?
            .get(id)
            .cloned()
            .ok_or_else(|| CredError::CredentialNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_kel::EventKind;

    #[test]
    fn test_log_source_round_trip() {
        let source = InMemoryLogSource::new();
        source.insert(
            IdentifierId::new("EAid"),
            vec![RawEvent {
                sequence: 0,
                kind: EventKind::Inception,
                digest: "ED0".to_string(),
                prior_digest: None,
                delegator: None,
                anchors: vec![],
                witnesses: None,
                witness_threshold: None,
            }],
        );
        assert_eq!(source.fetch_log(&IdentifierId::new("EAid")).unwrap().len(), 1);
        assert!(matches!(
            source.fetch_log(&IdentifierId::new("EMissing")),
            Err(KelError::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn test_receipt_source_keyed_by_sequence() {
        let source = InMemoryReceiptSource::new();
        source.insert(
            IdentifierId::new("EAid"),
            0,
            WitnessReceipt {
                witness: tessera_core::WitnessId::new("BW1"),
                event_digest: tessera_core::EventDigest::new("ED0"),
                sequence: 0,
                signature: None,
            },
        );
        assert_eq!(
            source
                .fetch_receipts(&IdentifierId::new("EAid"), 0)
                .unwrap()
                .len(),
            1
        );
        assert!(source
            .fetch_receipts(&IdentifierId::new("EAid"), 1)
            .unwrap()
            .is_empty());
    }
}
