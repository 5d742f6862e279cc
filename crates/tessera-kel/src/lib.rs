//! Tessera event log model.
//!
//! Typed representation of an identifier's append-only event history,
//! plus the two checks that read it directly:
//!
//! 1. Seal matching — extracting a delegation anchor from a delegator's
//!    interaction events and validating it against the delegate's
//!    inception (the digest check is the cryptographic proof).
//! 2. State consistency — symmetric comparison of two independently
//!    obtained views of the same identifier's log.
//!
//! Structural invariants (contiguous sequences, digest chaining,
//! inception placement, digest uniqueness) are enforced at load time.
//! A log that fails them is rejected immediately, citing the offending
//! position — nothing downstream ever sees a malformed log.

pub mod consistency;
pub mod error;
pub mod event;
pub mod log;
pub mod seal;

pub use consistency::{compare, ConsistencyResult, Divergence};
pub use error::{KelError, KelResult};
pub use event::{Event, EventKind, RawEvent, RawSeal, Seal};
pub use log::{EventLog, LogSource};
pub use seal::{find_seal, validate_seal, DuplicateSeal, SealMatch, SealValidation};
