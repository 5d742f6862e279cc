//! Tessera witness quorum evaluation.
//!
//! An event is confirmed when enough distinct recognized witnesses have
//! receipted it. The counting core is synchronous and pure:
//! filter receipts to the observed digest and the recognized pool,
//! deduplicate by witness, compare against the threshold. Everything
//! about *gathering* receipts — parallel queries, per-witness timeouts,
//! an overall deadline, early success and early mathematical failure —
//! lives in the async collector layered on top.
//!
//! No retry policy lives here. A shortfall is a result
//! (`satisfied = false` with the partial count attached), not an error;
//! callers retry with backoff as receipts propagate.

pub mod collector;
pub mod error;
pub mod evaluate;
pub mod receipt;

pub use collector::{collect_receipts, CollectionPolicy, WitnessClient};
pub use error::QuorumError;
pub use evaluate::{evaluate, QuorumResult};
pub use receipt::{
    receipt_message, verify_receipt_signatures, ReceiptScreening, ReceiptSource, RejectedReceipt,
    RejectionReason, WitnessReceipt,
};
