//! Tessera core types.
//!
//! Shared vocabulary for the verification engine: typed identifiers,
//! event digests, timestamps, witness configuration, and the injected
//! signature-verification primitive. No verification policy lives here.

pub mod crypto;
pub mod error;
pub mod traits;
pub mod types;

pub use crypto::*;
pub use error::*;
pub use traits::*;
pub use types::*;
