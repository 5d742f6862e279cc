//! Single-edge validation.
//!
//! Checks run in order and the first failure aborts the edge with a
//! reason carrying the literal values on both sides — an edge is never
//! partially valid:
//!
//! 1. the edge exists on the child
//! 2. structural reference: the edge names the presented parent
//! 3. schema binding: the parent conforms to the declared schema
//! 4. the operator's role rule

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use tessera_core::{CredentialId, IdentifierId, SchemaId};

use crate::types::{Credential, EdgeOperator};

// ---------------------------------------------------------------------------
// DelegationResolver — how DI2I learns who delegates for whom
// ---------------------------------------------------------------------------

/// Resolves an identifier to the delegator named by its delegated
/// inception, if it has one. The orchestrator implements this over the
/// log source; tests use a plain map.
pub trait DelegationResolver: Send + Sync {
    fn delegator_of(&self, identifier: &IdentifierId) -> Option<IdentifierId>;
}

/// Resolver for contexts with no delegation information: every lookup
/// misses, so DI2I degrades to plain I2I.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelegation;

impl DelegationResolver for NoDelegation {
    fn delegator_of(&self, _identifier: &IdentifierId) -> Option<IdentifierId> {
        None
    }
}

impl DelegationResolver for BTreeMap<IdentifierId, IdentifierId> {
    fn delegator_of(&self, identifier: &IdentifierId) -> Option<IdentifierId> {
        self.get(identifier).cloned()
    }
}

// ---------------------------------------------------------------------------
// EdgeValidation — the outcome of checking one edge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeFailure {
    MissingEdge {
        edge_name: String,
    },
    /// The edge names a different parent than the one presented.
    ReferenceMismatch {
        declared: CredentialId,
        actual: CredentialId,
    },
    /// The presented parent's schema is not the one the edge binds to.
    SchemaMismatch {
        declared: SchemaId,
        actual: SchemaId,
    },
    /// The operator's role rule failed.
    OperatorViolation {
        operator: EdgeOperator,
        child_issuer: IdentifierId,
        parent_issuee: IdentifierId,
    },
}

impl fmt::Display for EdgeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeFailure::MissingEdge { edge_name } => {
                write!(f, "no edge named '{}'", edge_name)
            }
            EdgeFailure::ReferenceMismatch { declared, actual } => {
                write!(f, "edge declares parent {} but {} was presented", declared, actual)
            }
            EdgeFailure::SchemaMismatch { declared, actual } => {
                write!(
                    f,
                    "edge requires parent schema {} but parent conforms to {}",
                    declared, actual
                )
            }
            EdgeFailure::OperatorViolation {
                operator,
                child_issuer,
                parent_issuee,
            } => {
                write!(
                    f,
                    "{} violated: child issuer {} is not authorized by parent issuee {}",
                    operator, child_issuer, parent_issuee
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeValidation {
    pub child: CredentialId,
    pub edge_name: String,
    pub parent: CredentialId,
    pub operator: EdgeOperator,
    pub failure: Option<EdgeFailure>,
}

impl EdgeValidation {
    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }
}

/// Validate one edge of `child` against the presented `parent`.
pub fn validate_edge(
    child: &Credential,
    edge_name: &str,
    parent: &Credential,
    resolver: &dyn DelegationResolver,
) -> EdgeValidation {
    let mut validation = EdgeValidation {
        child: child.id.clone(),
        edge_name: edge_name.to_string(),
        parent: parent.id.clone(),
        operator: EdgeOperator::default(),
        failure: None,
    };

    let Some(edge) = child.edges.get(edge_name) else {
        validation.failure = Some(EdgeFailure::MissingEdge {
            edge_name: edge_name.to_string(),
        });
        return validation;
    };
    validation.operator = edge.operator;

    if edge.parent != parent.id {
        validation.failure = Some(EdgeFailure::ReferenceMismatch {
            declared: edge.parent.clone(),
            actual: parent.id.clone(),
        });
        return validation;
    }

    if edge.parent_schema != parent.schema {
        validation.failure = Some(EdgeFailure::SchemaMismatch {
            declared: edge.parent_schema.clone(),
            actual: parent.schema.clone(),
        });
        return validation;
    }

    let issuer_matches = child.issuer == parent.issuee;
    let rule_holds = match edge.operator {
        EdgeOperator::IssuerToIssuee => issuer_matches,
        EdgeOperator::NotConstrained => true,
        EdgeOperator::DelegatedIssuerToIssuee => {
            issuer_matches
                || resolver
                    .delegator_of(&child.issuer)
                    .is_some_and(|delegator| delegator == parent.issuee)
        }
    };
    if !rule_holds {
        validation.failure = Some(EdgeFailure::OperatorViolation {
            operator: edge.operator,
            child_issuer: child.issuer.clone(),
            parent_issuee: parent.issuee.clone(),
        });
        tracing::debug!(
            child = %child.id,
            edge = edge_name,
            operator = %edge.operator,
            "edge operator rule failed"
        );
    }

    validation
}
