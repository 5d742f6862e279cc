//! The verification orchestrator.

use serde_json::json;

use tessera_core::{CredentialId, IdentifierId, SignatureVerifier};
use tessera_cred::{
    walk, CredentialGraph, CredentialSource, DelegationResolver,
};
use tessera_kel::{
    compare, find_seal, validate_seal, EventLog, LogSource,
};
use tessera_quorum::{evaluate, verify_receipt_signatures, ReceiptSource};

use crate::error::VerifyResult;
use crate::policy::TrustPolicy;
use crate::report::{CheckLevel, CheckStatus, Report};

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

/// Composes the component checks into ordered levels and produces a
/// complete [`Report`] per run. Holds no mutable state: one instance
/// can serve concurrent verifications under one trust policy.
pub struct Verifier<'a> {
    logs: &'a dyn LogSource,
    receipts: &'a dyn ReceiptSource,
    credentials: &'a dyn CredentialSource,
    policy: TrustPolicy,
    signature_verifier: Option<&'a dyn SignatureVerifier>,
}

impl<'a> Verifier<'a> {
    pub fn new(
        logs: &'a dyn LogSource,
        receipts: &'a dyn ReceiptSource,
        credentials: &'a dyn CredentialSource,
        policy: TrustPolicy,
    ) -> VerifyResult<Self> {
        policy.validate()?;
        Ok(Self {
            logs,
            receipts,
            credentials,
            policy,
            signature_verifier: None,
        })
    }

    /// Inject the signature primitive used to screen witness receipts
    /// against the policy's known keys. Without one, receipts pass
    /// through unscreened.
    pub fn with_signature_verifier(mut self, verifier: &'a dyn SignatureVerifier) -> Self {
        self.signature_verifier = Some(verifier);
        self
    }

    /// Run every level against the claimed delegation of `delegate`.
    ///
    /// The trust chain level runs only when a leaf credential is named;
    /// the state consistency level only when a second log source is
    /// supplied. A reference failure skips everything above it.
    pub fn verify_delegation(
        &self,
        delegate: &IdentifierId,
        leaf_credential: Option<&CredentialId>,
        remote_logs: Option<&dyn LogSource>,
    ) -> Report {
        let mut report = Report::new(delegate.clone());
        tracing::info!(delegate = %delegate, "verification run started");

        let Some((delegate_log, delegator_log)) = self.check_reference(delegate, &mut report)
        else {
            for level in [
                CheckLevel::DelegationSeal,
                CheckLevel::WitnessConsensus,
                CheckLevel::TrustChain,
                CheckLevel::StateConsistency,
            ] {
                report.skip(level, "reference check failed");
            }
            return report;
        };

        self.check_seal(&delegate_log, &delegator_log, &mut report);
        self.check_witnesses(&delegate_log, &mut report);

        match leaf_credential {
            Some(leaf) => self.check_chain(leaf, &mut report),
            None => report.skip(CheckLevel::TrustChain, "no leaf credential supplied"),
        }

        match remote_logs {
            Some(remote) => self.check_consistency(&delegate_log, remote, &mut report),
            None => report.skip(CheckLevel::StateConsistency, "no remote view supplied"),
        }

        report
    }

    // --- Level 1: reference -------------------------------------------------

    fn check_reference(
        &self,
        delegate: &IdentifierId,
        report: &mut Report,
    ) -> Option<(EventLog, EventLog)> {
        let level = CheckLevel::Reference;

        let raw = match self.logs.fetch_log(delegate) {
            Ok(raw) => raw,
            Err(err) => {
                report.fail(level, format!("could not fetch delegate log: {}", err), None);
                return None;
            }
        };
        let delegate_log = match EventLog::load(delegate.clone(), raw) {
            Ok(log) => log,
            Err(err) => {
                report.fail(level, format!("delegate log rejected: {}", err), None);
                return None;
            }
        };

        let Some(delegator) = delegate_log.delegator().cloned() else {
            report.fail(
                level,
                format!("log of {} has no delegated inception", delegate),
                None,
            );
            return None;
        };

        let raw = match self.logs.fetch_log(&delegator) {
            Ok(raw) => raw,
            Err(err) => {
                report.fail(
                    level,
                    format!("referenced delegator log unavailable: {}", err),
                    Some(json!({ "delegator": delegator.as_str() })),
                );
                return None;
            }
        };
        let delegator_log = match EventLog::load(delegator.clone(), raw) {
            Ok(log) => log,
            Err(err) => {
                report.fail(level, format!("delegator log rejected: {}", err), None);
                return None;
            }
        };

        report.push(
            level,
            CheckStatus::Pass,
            format!(
                "delegated inception of {} references {}; both logs loaded",
                delegate, delegator
            ),
            Some(json!({
                "delegate_events": delegate_log.len(),
                "delegator_events": delegator_log.len(),
            })),
        );
        Some((delegate_log, delegator_log))
    }

    // --- Level 2: delegation seal ------------------------------------------

    fn check_seal(&self, delegate_log: &EventLog, delegator_log: &EventLog, report: &mut Report) {
        let level = CheckLevel::DelegationSeal;
        let delegate_event = delegate_log.inception();

        let seal_match = match find_seal(
            delegator_log,
            delegate_log.identifier(),
            delegate_event.sequence,
        ) {
            Ok(m) => m,
            Err(err) => {
                // Possibly an incomplete handshake upstream; the caller
                // may retry after a delay.
                report.fail(
                    level,
                    format!("{}; delegation not (yet) established", err),
                    Some(json!({
                        "delegate": delegate_log.identifier().as_str(),
                        "sequence": delegate_event.sequence,
                    })),
                );
                return;
            }
        };

        let validation = validate_seal(delegate_event, &seal_match.seal);
        let values = json!({
            "anchored_at": seal_match.anchored_at,
            "event_owner": validation.event_owner.as_str(),
            "seal_target": validation.seal_target.as_str(),
            "event_sequence": validation.event_sequence,
            "seal_sequence": validation.seal_sequence,
            "event_digest": validation.event_digest.as_str(),
            "seal_digest": validation.seal_digest.as_str(),
            "duplicates": seal_match.duplicates,
        });

        if !validation.is_valid() {
            let mut failed = Vec::new();
            if !validation.identifier_match {
                failed.push("target identifier");
            }
            if !validation.sequence_match {
                failed.push("target sequence");
            }
            if !validation.digest_match {
                failed.push("target digest");
            }
            report.fail(
                level,
                format!("seal mismatch on: {}", failed.join(", ")),
                Some(values),
            );
            return;
        }

        if seal_match.duplicates.is_empty() {
            report.push(
                level,
                CheckStatus::Pass,
                format!(
                    "delegator anchors event {} at its sequence {}",
                    validation.event_digest, seal_match.anchored_at
                ),
                Some(values),
            );
        } else {
            let conflicting = seal_match
                .duplicates
                .iter()
                .filter(|d| d.conflicting)
                .count();
            report.warn(
                level,
                format!(
                    "seal valid; {} duplicate anchor(s), {} conflicting — earliest wins",
                    seal_match.duplicates.len(),
                    conflicting
                ),
                Some(values),
            );
        }
    }

    // --- Level 3: witness consensus ----------------------------------------

    fn check_witnesses(&self, delegate_log: &EventLog, report: &mut Report) {
        let level = CheckLevel::WitnessConsensus;
        let event = delegate_log.inception();

        let Some(config) = delegate_log
            .witness_config()
            .or_else(|| self.policy.witness_config.clone())
        else {
            report.warn(
                level,
                "no witness configuration declared or supplied; consensus not evaluated",
                None,
            );
            return;
        };

        let receipts = match self
            .receipts
            .fetch_receipts(delegate_log.identifier(), event.sequence)
        {
            Ok(receipts) => receipts,
            Err(err) => {
                report.fail(level, format!("could not fetch receipts: {}", err), None);
                return;
            }
        };

        let (receipts, rejected) = match self.signature_verifier {
            Some(verifier) if !self.policy.witness_keys.is_empty() => {
                let screening =
                    verify_receipt_signatures(receipts, &self.policy.witness_keys, verifier);
                (screening.accepted, screening.rejected)
            }
            _ => (receipts, vec![]),
        };

        let result = match evaluate(event, &receipts, &config) {
            Ok(result) => result,
            Err(err) => {
                report.fail(level, format!("quorum evaluation refused: {}", err), None);
                return;
            }
        };

        let values = json!({
            "received": result.received,
            "threshold": result.threshold,
            "witnesses": result.witnesses,
            "unrecognized": result.unrecognized,
            "duplicates": result.duplicates,
            "rejected_signatures": rejected.len(),
        });

        if result.trivial {
            report.warn(
                level,
                "witness threshold is zero; no consensus is being required",
                Some(values),
            );
        } else if result.satisfied {
            report.push(
                level,
                CheckStatus::Pass,
                format!(
                    "quorum satisfied: {} of {} required receipts",
                    result.received, result.threshold
                ),
                Some(values),
            );
        } else {
            // Expected to resolve as receipts propagate; retry with
            // backoff is legitimate.
            report.fail(
                level,
                format!(
                    "insufficient quorum: {} of {} required receipts",
                    result.received, result.threshold
                ),
                Some(values),
            );
        }
    }

    // --- Level 4: credential trust chain -----------------------------------

    fn check_chain(&self, leaf: &CredentialId, report: &mut Report) {
        let level = CheckLevel::TrustChain;

        // Resolve the reachable graph through the collaborator.
        let mut graph = CredentialGraph::new();
        let mut pending = vec![leaf.clone()];
        while let Some(id) = pending.pop() {
            if graph.contains(&id) {
                continue;
            }
            let credential = match self.credentials.fetch_credential(&id) {
                Ok(credential) => credential,
                Err(err) => {
                    report.fail(
                        level,
                        format!("could not resolve credential graph: {}", err),
                        Some(json!({ "credential": id.as_str() })),
                    );
                    return;
                }
            };
            pending.extend(credential.edges.values().map(|e| e.parent.clone()));
            if let Err(err) = graph.insert(credential) {
                report.fail(level, format!("credential rejected: {}", err), None);
                return;
            }
        }

        let resolver = LogDelegationResolver { logs: self.logs };
        let validation = match walk(leaf, &graph, &resolver) {
            Ok(validation) => validation,
            Err(err) => {
                report.fail(level, format!("chain structurally invalid: {}", err), None);
                return;
            }
        };

        if !validation.valid {
            let failure = validation
                .failure
                .expect("invalid chain carries its failure");
            report.fail(
                level,
                format!(
                    "chain broken at hop {} ({} -> {} via '{}'): {}",
                    failure.hop, failure.child, failure.parent, failure.edge_name, failure.reason
                ),
                Some(json!({
                    "hop": failure.hop,
                    "child": failure.child.as_str(),
                    "parent": failure.parent.as_str(),
                    "edge": failure.edge_name,
                    "reason": failure.reason.to_string(),
                    "validated_path": validation.path,
                })),
            );
            return;
        }

        let root_issuers: Vec<IdentifierId> = validation
            .roots
            .iter()
            .filter_map(|id| graph.get(id).ok().map(|c| c.issuer.clone()))
            .collect();
        let values = json!({
            "path": validation.path,
            "roots": validation.roots,
            "root_issuers": root_issuers,
        });

        if self.policy.trusted_roots.is_empty() {
            report.warn(
                level,
                "chain valid, but no trusted roots configured; any root accepted",
                Some(values),
            );
        } else if root_issuers.iter().all(|i| self.policy.trusts_root(i)) {
            report.push(
                level,
                CheckStatus::Pass,
                format!("chain valid across {} credential(s) to trusted root", validation.path.len()),
                Some(values),
            );
        } else {
            let untrusted: Vec<&IdentifierId> = root_issuers
                .iter()
                .filter(|i| !self.policy.trusts_root(i))
                .collect();
            report.fail(
                level,
                format!(
                    "chain valid but root issuer(s) not trusted: {}",
                    untrusted
                        .iter()
                        .map(|i| i.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                Some(values),
            );
        }
    }

    // --- Level 5: state consistency ----------------------------------------

    fn check_consistency(
        &self,
        local: &EventLog,
        remote_logs: &dyn LogSource,
        report: &mut Report,
    ) {
        let level = CheckLevel::StateConsistency;
        let identifier = local.identifier();

        let raw = match remote_logs.fetch_log(identifier) {
            Ok(raw) => raw,
            Err(err) => {
                report.fail(level, format!("could not fetch remote view: {}", err), None);
                return;
            }
        };
        let remote = match EventLog::load(identifier.clone(), raw) {
            Ok(log) => log,
            Err(err) => {
                report.fail(level, format!("remote view rejected: {}", err), None);
                return;
            }
        };

        let result = match compare(local, &remote) {
            Ok(result) => result,
            Err(err) => {
                report.fail(level, format!("views not comparable: {}", err), None);
                return;
            }
        };

        if result.is_consistent() {
            report.pass(
                level,
                format!(
                    "local and remote views agree at sequence {}",
                    local.latest().sequence
                ),
            );
        } else {
            // Symmetric report: which side is authoritative is the
            // caller's judgment.
            let rendered: Vec<String> = result.divergences.iter().map(|d| d.to_string()).collect();
            report.fail(
                level,
                format!("views diverge on {} field(s)", result.divergences.len()),
                Some(json!({
                    "divergences": result.divergences,
                    "rendered": rendered,
                })),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// LogDelegationResolver — DI2I edges resolved through the log source
// ---------------------------------------------------------------------------

struct LogDelegationResolver<'a> {
    logs: &'a dyn LogSource,
}

impl DelegationResolver for LogDelegationResolver<'_> {
    fn delegator_of(&self, identifier: &IdentifierId) -> Option<IdentifierId> {
        let raw = self.logs.fetch_log(identifier).ok()?;
        let log = EventLog::load(identifier.clone(), raw).ok()?;
        log.delegator().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CheckStatus;
    use crate::sources::{InMemoryCredentialSource, InMemoryLogSource, InMemoryReceiptSource};
    use std::collections::BTreeMap;
    use tessera_core::{EventDigest, SchemaId, WitnessConfig, WitnessId};
    use tessera_cred::{Credential, EdgeOperator, EdgeRef};
    use tessera_kel::{EventKind, RawEvent, RawSeal};
    use tessera_quorum::WitnessReceipt;

    const DELEGATE: &str = "EDelegate";
    const DELEGATOR: &str = "EBoss";
    const DIP_DIGEST: &str = "ED1";

    fn raw(sequence: u64, kind: EventKind, digest: &str, prior: Option<&str>) -> RawEvent {
        RawEvent {
            sequence,
            kind,
            digest: digest.to_string(),
            prior_digest: prior.map(str::to_string),
            delegator: None,
            anchors: vec![],
            witnesses: None,
            witness_threshold: None,
        }
    }

    fn delegate_events(witnesses: Option<(Vec<&str>, u32)>) -> Vec<RawEvent> {
        let mut dip = raw(0, EventKind::DelegatedInception, DIP_DIGEST, None);
        dip.delegator = Some(DELEGATOR.to_string());
        if let Some((ws, threshold)) = witnesses {
            dip.witnesses = Some(ws.into_iter().map(str::to_string).collect());
            dip.witness_threshold = Some(threshold);
        }
        vec![dip]
    }

    fn delegator_events(anchor_digest: &str) -> Vec<RawEvent> {
        let mut ixn = raw(1, EventKind::Interaction, "EB1", Some("EB0"));
        ixn.anchors.push(RawSeal {
            target: DELEGATE.to_string(),
            target_sequence: 0,
            target_digest: anchor_digest.to_string(),
        });
        vec![raw(0, EventKind::Inception, "EB0", None), ixn]
    }

    fn receipt(witness: &str) -> WitnessReceipt {
        WitnessReceipt {
            witness: WitnessId::new(witness),
            event_digest: EventDigest::new(DIP_DIGEST),
            sequence: 0,
            signature: None,
        }
    }

    /// A fully healthy scenario: anchored delegation, two witnesses at
    /// threshold 2, a two-credential chain to a trusted root.
    struct Scenario {
        logs: InMemoryLogSource,
        receipts: InMemoryReceiptSource,
        credentials: InMemoryCredentialSource,
        policy: TrustPolicy,
    }

    impl Scenario {
        fn healthy() -> Self {
            let logs = InMemoryLogSource::new();
            logs.insert(
                IdentifierId::new(DELEGATE),
                delegate_events(Some((vec!["BW1", "BW2", "BW3"], 2))),
            );
            logs.insert(IdentifierId::new(DELEGATOR), delegator_events(DIP_DIGEST));

            let receipts = InMemoryReceiptSource::new();
            receipts.insert(IdentifierId::new(DELEGATE), 0, receipt("BW1"));
            receipts.insert(IdentifierId::new(DELEGATE), 0, receipt("BW2"));

            let credentials = InMemoryCredentialSource::new();
            let root = Credential {
                id: CredentialId::new("cred-root"),
                schema: SchemaId::new("schema-root"),
                issuer: IdentifierId::new("ERootIssuer"),
                issuee: IdentifierId::new(DELEGATOR),
                edges: BTreeMap::new(),
            };
            let mut leaf = Credential {
                id: CredentialId::new("cred-leaf"),
                schema: SchemaId::new("schema-leaf"),
                issuer: IdentifierId::new(DELEGATE),
                issuee: IdentifierId::new("EHolder"),
                edges: BTreeMap::new(),
            };
            leaf.edges.insert(
                "auth".to_string(),
                EdgeRef {
                    parent: root.id.clone(),
                    parent_schema: root.schema.clone(),
                    // The delegate issues under its delegator's grant.
                    operator: EdgeOperator::DelegatedIssuerToIssuee,
                },
            );
            credentials.insert(root);
            credentials.insert(leaf);

            let policy = TrustPolicy {
                trusted_roots: [IdentifierId::new("ERootIssuer")].into_iter().collect(),
                ..Default::default()
            };

            Self {
                logs,
                receipts,
                credentials,
                policy,
            }
        }

        fn verifier(&self) -> Verifier<'_> {
            Verifier::new(&self.logs, &self.receipts, &self.credentials, self.policy.clone())
                .unwrap()
        }

        fn run(&self) -> Report {
            self.verifier().verify_delegation(
                &IdentifierId::new(DELEGATE),
                Some(&CredentialId::new("cred-leaf")),
                None,
            )
        }
    }

    #[test]
    fn test_healthy_scenario_passes_every_run_level() {
        let scenario = Scenario::healthy();
        let report = scenario.run();
        assert!(report.passed(), "report:\n{}", report);
        assert_eq!(report.status_of(CheckLevel::Reference), Some(CheckStatus::Pass));
        assert_eq!(
            report.status_of(CheckLevel::DelegationSeal),
            Some(CheckStatus::Pass)
        );
        assert_eq!(
            report.status_of(CheckLevel::WitnessConsensus),
            Some(CheckStatus::Pass)
        );
        assert_eq!(report.status_of(CheckLevel::TrustChain), Some(CheckStatus::Pass));
        assert_eq!(
            report.status_of(CheckLevel::StateConsistency),
            Some(CheckStatus::Skipped)
        );
    }

    #[test]
    fn test_unknown_delegate_fails_reference_and_skips_the_rest() {
        let scenario = Scenario::healthy();
        let report = scenario.verifier().verify_delegation(
            &IdentifierId::new("ENobody"),
            None,
            None,
        );
        assert_eq!(report.status_of(CheckLevel::Reference), Some(CheckStatus::Fail));
        for level in [
            CheckLevel::DelegationSeal,
            CheckLevel::WitnessConsensus,
            CheckLevel::TrustChain,
            CheckLevel::StateConsistency,
        ] {
            assert_eq!(report.status_of(level), Some(CheckStatus::Skipped));
        }
        // Total failure still yields a complete report.
        assert_eq!(report.entries.len(), 5);
    }

    #[test]
    fn test_malformed_delegate_log_fails_reference() {
        let scenario = Scenario::healthy();
        let mut events = delegate_events(None);
        events.push(raw(1, EventKind::Interaction, "EDX", Some("EWRONG")));
        scenario.logs.insert(IdentifierId::new(DELEGATE), events);

        let report = scenario.run();
        assert_eq!(report.status_of(CheckLevel::Reference), Some(CheckStatus::Fail));
        let entry = &report.entries[0];
        assert!(entry.detail.contains("sequence 1"));
    }

    #[test]
    fn test_non_delegated_identifier_fails_reference() {
        let scenario = Scenario::healthy();
        scenario.logs.insert(
            IdentifierId::new(DELEGATE),
            vec![raw(0, EventKind::Inception, DIP_DIGEST, None)],
        );
        let report = scenario.run();
        assert_eq!(report.status_of(CheckLevel::Reference), Some(CheckStatus::Fail));
    }

    #[test]
    fn test_missing_delegator_log_fails_reference() {
        let scenario = Scenario::healthy();
        let logs = InMemoryLogSource::new();
        logs.insert(
            IdentifierId::new(DELEGATE),
            delegate_events(Some((vec!["BW1"], 1))),
        );
        let verifier = Verifier::new(
            &logs,
            &scenario.receipts,
            &scenario.credentials,
            scenario.policy.clone(),
        )
        .unwrap();
        let report = verifier.verify_delegation(&IdentifierId::new(DELEGATE), None, None);
        let entry = &report.entries[0];
        assert_eq!(entry.status, CheckStatus::Fail);
        assert!(entry.detail.contains("delegator log unavailable"));
    }

    #[test]
    fn test_seal_digest_mismatch_fails_with_both_digests() {
        let scenario = Scenario::healthy();
        scenario
            .logs
            .insert(IdentifierId::new(DELEGATOR), delegator_events("ED2"));

        let report = scenario.run();
        assert_eq!(
            report.status_of(CheckLevel::DelegationSeal),
            Some(CheckStatus::Fail)
        );
        let entry = report
            .entries
            .iter()
            .find(|e| e.level == CheckLevel::DelegationSeal)
            .unwrap();
        let values = entry.values.as_ref().unwrap();
        assert_eq!(values["event_digest"], "ED1");
        assert_eq!(values["seal_digest"], "ED2");
        // Later levels still run; only reference failures skip.
        assert_eq!(
            report.status_of(CheckLevel::WitnessConsensus),
            Some(CheckStatus::Pass)
        );
    }

    #[test]
    fn test_missing_seal_fails_level() {
        let scenario = Scenario::healthy();
        scenario.logs.insert(
            IdentifierId::new(DELEGATOR),
            vec![raw(0, EventKind::Inception, "EB0", None)],
        );
        let report = scenario.run();
        assert_eq!(
            report.status_of(CheckLevel::DelegationSeal),
            Some(CheckStatus::Fail)
        );
    }

    #[test]
    fn test_duplicate_anchor_downgrades_to_warning() {
        let scenario = Scenario::healthy();
        let mut events = delegator_events(DIP_DIGEST);
        let mut second = raw(2, EventKind::Interaction, "EB2", Some("EB1"));
        second.anchors.push(RawSeal {
            target: DELEGATE.to_string(),
            target_sequence: 0,
            target_digest: DIP_DIGEST.to_string(),
        });
        events.push(second);
        scenario.logs.insert(IdentifierId::new(DELEGATOR), events);

        let report = scenario.run();
        assert_eq!(
            report.status_of(CheckLevel::DelegationSeal),
            Some(CheckStatus::Warn)
        );
        assert!(report.passed());
    }

    #[test]
    fn test_insufficient_receipts_fail_with_partial_count() {
        let scenario = Scenario::healthy();
        let receipts = InMemoryReceiptSource::new();
        receipts.insert(IdentifierId::new(DELEGATE), 0, receipt("BW1"));
        let verifier = Verifier::new(
            &scenario.logs,
            &receipts,
            &scenario.credentials,
            scenario.policy.clone(),
        )
        .unwrap();
        let report = verifier.verify_delegation(&IdentifierId::new(DELEGATE), None, None);
        let entry = report
            .entries
            .iter()
            .find(|e| e.level == CheckLevel::WitnessConsensus)
            .unwrap();
        assert_eq!(entry.status, CheckStatus::Fail);
        let values = entry.values.as_ref().unwrap();
        assert_eq!(values["received"], 1);
        assert_eq!(values["threshold"], 2);
    }

    #[test]
    fn test_no_witness_config_anywhere_is_a_warning() {
        let scenario = Scenario::healthy();
        scenario
            .logs
            .insert(IdentifierId::new(DELEGATE), delegate_events(None));
        let report = scenario.run();
        assert_eq!(
            report.status_of(CheckLevel::WitnessConsensus),
            Some(CheckStatus::Warn)
        );
    }

    #[test]
    fn test_policy_fallback_config_used_when_log_declares_none() {
        let scenario = Scenario::healthy();
        scenario
            .logs
            .insert(IdentifierId::new(DELEGATE), delegate_events(None));
        let mut policy = scenario.policy.clone();
        policy.witness_config = Some(WitnessConfig::new(
            [WitnessId::new("BW1"), WitnessId::new("BW2")],
            2,
        ));
        let verifier = Verifier::new(
            &scenario.logs,
            &scenario.receipts,
            &scenario.credentials,
            policy,
        )
        .unwrap();
        let report = verifier.verify_delegation(&IdentifierId::new(DELEGATE), None, None);
        assert_eq!(
            report.status_of(CheckLevel::WitnessConsensus),
            Some(CheckStatus::Pass)
        );
    }

    #[test]
    fn test_zero_threshold_warns() {
        let scenario = Scenario::healthy();
        scenario.logs.insert(
            IdentifierId::new(DELEGATE),
            delegate_events(Some((vec!["BW1"], 0))),
        );
        let report = scenario.run();
        assert_eq!(
            report.status_of(CheckLevel::WitnessConsensus),
            Some(CheckStatus::Warn)
        );
    }

    #[test]
    fn test_broken_chain_fails_trust_level() {
        let scenario = Scenario::healthy();
        // Re-point the leaf's edge at a parent whose issuee grants
        // nothing to the delegate.
        let root = Credential {
            id: CredentialId::new("cred-root"),
            schema: SchemaId::new("schema-root"),
            issuer: IdentifierId::new("ERootIssuer"),
            issuee: IdentifierId::new("EUnrelated"),
            edges: BTreeMap::new(),
        };
        scenario.credentials.insert(root);

        let report = scenario.run();
        let entry = report
            .entries
            .iter()
            .find(|e| e.level == CheckLevel::TrustChain)
            .unwrap();
        assert_eq!(entry.status, CheckStatus::Fail);
        assert!(entry.detail.contains("hop 1"));
    }

    #[test]
    fn test_empty_trusted_roots_warns_instead_of_passing_silently() {
        let scenario = Scenario::healthy();
        let mut policy = scenario.policy.clone();
        policy.trusted_roots.clear();
        let verifier = Verifier::new(
            &scenario.logs,
            &scenario.receipts,
            &scenario.credentials,
            policy,
        )
        .unwrap();
        let report = verifier.verify_delegation(
            &IdentifierId::new(DELEGATE),
            Some(&CredentialId::new("cred-leaf")),
            None,
        );
        assert_eq!(
            report.status_of(CheckLevel::TrustChain),
            Some(CheckStatus::Warn)
        );
    }

    #[test]
    fn test_untrusted_root_fails() {
        let scenario = Scenario::healthy();
        let mut policy = scenario.policy.clone();
        policy.trusted_roots = [IdentifierId::new("ESomeoneElse")].into_iter().collect();
        let verifier = Verifier::new(
            &scenario.logs,
            &scenario.receipts,
            &scenario.credentials,
            policy,
        )
        .unwrap();
        let report = verifier.verify_delegation(
            &IdentifierId::new(DELEGATE),
            Some(&CredentialId::new("cred-leaf")),
            None,
        );
        let entry = report
            .entries
            .iter()
            .find(|e| e.level == CheckLevel::TrustChain)
            .unwrap();
        assert_eq!(entry.status, CheckStatus::Fail);
        assert!(entry.detail.contains("ERootIssuer"));
    }

    #[test]
    fn test_consistent_remote_view_passes() {
        let scenario = Scenario::healthy();
        let remote = InMemoryLogSource::new();
        remote.insert(
            IdentifierId::new(DELEGATE),
            delegate_events(Some((vec!["BW1", "BW2", "BW3"], 2))),
        );
        let report = scenario.verifier().verify_delegation(
            &IdentifierId::new(DELEGATE),
            None,
            Some(&remote),
        );
        assert_eq!(
            report.status_of(CheckLevel::StateConsistency),
            Some(CheckStatus::Pass)
        );
    }

    #[test]
    fn test_diverging_remote_view_fails_with_both_values() {
        let scenario = Scenario::healthy();
        let remote = InMemoryLogSource::new();
        let mut events = delegate_events(Some((vec!["BW1", "BW2", "BW3"], 2)));
        events.push(raw(1, EventKind::Interaction, "EDX", Some(DIP_DIGEST)));
        remote.insert(IdentifierId::new(DELEGATE), events);

        let report = scenario.verifier().verify_delegation(
            &IdentifierId::new(DELEGATE),
            None,
            Some(&remote),
        );
        let entry = report
            .entries
            .iter()
            .find(|e| e.level == CheckLevel::StateConsistency)
            .unwrap();
        assert_eq!(entry.status, CheckStatus::Fail);
        let rendered = entry.values.as_ref().unwrap()["rendered"].to_string();
        assert!(rendered.contains("local 0"));
        assert!(rendered.contains("remote 1"));
    }

    #[test]
    fn test_invalid_policy_rejected_at_construction() {
        let scenario = Scenario::healthy();
        let policy = TrustPolicy {
            witness_config: Some(WitnessConfig::new([WitnessId::new("BW1")], 9)),
            ..Default::default()
        };
        let result = Verifier::new(
            &scenario.logs,
            &scenario.receipts,
            &scenario.credentials,
            policy,
        );
        assert!(result.is_err());
    }
}
