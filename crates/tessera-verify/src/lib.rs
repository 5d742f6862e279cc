//! Tessera verification orchestrator.
//!
//! Composes the event log model, seal matcher, witness quorum
//! evaluator, trust chain walker, and state consistency checker into
//! ordered, named levels:
//!
//! 1. reference — both logs load and the delegation reference resolves
//! 2. delegation_seal — the delegator anchors the delegate's event
//! 3. witness_consensus — enough distinct witnesses receipted it
//! 4. trust_chain — the supporting credential chain holds to a root
//! 5. state_consistency — an independent view agrees
//!
//! Lower levels are prerequisites: if the reference check fails, higher
//! levels are marked skipped rather than attempted against missing
//! data. The outcome is always a complete [`Report`] — never a partial
//! crash — with the literal mismatching values attached to every
//! failure.
//!
//! The orchestrator is the single place that turns typed component
//! results into pass/fail/warn statuses; the components themselves
//! never decide policy.

pub mod error;
pub mod orchestrator;
pub mod policy;
pub mod report;
pub mod sources;

pub use error::{VerifyError, VerifyResult};
pub use orchestrator::Verifier;
pub use policy::TrustPolicy;
pub use report::{CheckLevel, CheckStatus, Report, ReportEntry};
pub use sources::{InMemoryCredentialSource, InMemoryLogSource, InMemoryReceiptSource};
