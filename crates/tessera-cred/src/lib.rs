//! Tessera credential trust chains.
//!
//! Credentials form a graph: each credential may reference parent
//! credentials through named edges, and each edge carries an operator
//! governing which identities may legitimately hold the roles involved:
//!
//! - `I2I` (issuer-to-issuee): the child's issuer must be the parent's
//!   issuee. The default when unspecified.
//! - `NI2I` (not-constrained): no role constraint.
//! - `DI2I` (delegated-issuer-to-issuee): as `I2I`, or the child's
//!   issuer is a delegate of the parent's issuee.
//!
//! The walker traverses breadth-first from a leaf credential to the
//! root(s), validating every declared edge. One broken link invalidates
//! everything above it — chains are not valid "on average".

pub mod chain;
pub mod edge;
pub mod error;
pub mod types;

pub use chain::{walk, ChainFailure, ChainValidation};
pub use edge::{
    validate_edge, DelegationResolver, EdgeFailure, EdgeValidation, NoDelegation,
};
pub use error::{CredError, CredResult};
pub use types::{Credential, CredentialGraph, CredentialSource, EdgeOperator, EdgeRef};
