use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use tessera_core::{CredentialId, IdentifierId, SchemaId};

use crate::error::{CredError, CredResult};

// ---------------------------------------------------------------------------
// EdgeOperator — authorization rule on one credential edge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeOperator {
    /// The child's issuer must be the parent's issuee. Default.
    #[default]
    #[serde(rename = "I2I")]
    IssuerToIssuee,
    /// No role constraint between child and parent.
    #[serde(rename = "NI2I")]
    NotConstrained,
    /// As I2I, or the child's issuer is a delegate of the parent's
    /// issuee — delegates inherit the grant.
    #[serde(rename = "DI2I")]
    DelegatedIssuerToIssuee,
}

impl fmt::Display for EdgeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeOperator::IssuerToIssuee => write!(f, "I2I"),
            EdgeOperator::NotConstrained => write!(f, "NI2I"),
            EdgeOperator::DelegatedIssuerToIssuee => write!(f, "DI2I"),
        }
    }
}

// ---------------------------------------------------------------------------
// EdgeRef — a named link from a credential to its parent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRef {
    /// The parent credential this edge claims.
    pub parent: CredentialId,
    /// The schema the parent must conform to.
    pub parent_schema: SchemaId,
    /// Authorization operator. Absent on the wire means I2I.
    #[serde(default)]
    pub operator: EdgeOperator,
}

// ---------------------------------------------------------------------------
// Credential — one node in the trust graph
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: CredentialId,
    pub schema: SchemaId,
    pub issuer: IdentifierId,
    pub issuee: IdentifierId,
    /// Outgoing edges by name. Empty for root credentials.
    #[serde(default)]
    pub edges: BTreeMap<String, EdgeRef>,
}

impl Credential {
    /// Structural checks independent of any graph context. Rejects the
    /// loosely produced records upstream systems emit before they can
    /// reach the validators.
    pub fn validate(&self) -> CredResult<()> {
        let malformed = |reason: &str| CredError::MalformedCredential {
            credential: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.is_empty() {
            return Err(malformed("credential id is empty"));
        }
        if self.schema.is_empty() {
            return Err(malformed("schema id is empty"));
        }
        if self.issuer.is_empty() {
            return Err(malformed("issuer is empty"));
        }
        if self.issuee.is_empty() {
            return Err(malformed("issuee is empty"));
        }
        for (name, edge) in &self.edges {
            if name.is_empty() {
                return Err(malformed("edge name is empty"));
            }
            if edge.parent.is_empty() {
                return Err(malformed(&format!("edge '{}' has an empty parent id", name)));
            }
            if edge.parent_schema.is_empty() {
                return Err(malformed(&format!(
                    "edge '{}' has an empty parent schema",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn is_root(&self) -> bool {
        self.edges.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CredentialGraph — the set of credentials a walk runs against
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialGraph {
    credentials: BTreeMap<CredentialId, Credential>,
}

impl CredentialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph, validating every credential on the way in.
    pub fn from_credentials(
        credentials: impl IntoIterator<Item = Credential>,
    ) -> CredResult<Self> {
        let mut graph = Self::new();
        for credential in credentials {
            graph.insert(credential)?;
        }
        Ok(graph)
    }

    pub fn insert(&mut self, credential: Credential) -> CredResult<()> {
        credential.validate()?;
        if self.credentials.contains_key(&credential.id) {
            return Err(CredError::MalformedCredential {
                credential: credential.id,
                reason: "duplicate credential id in graph".to_string(),
            });
        }
        self.credentials.insert(credential.id.clone(), credential);
        Ok(())
    }

    pub fn get(&self, id: &CredentialId) -> CredResult<&Credential> {
        self.credentials
            .get(id)
            .ok_or_else(|| CredError::CredentialNotFound(id.clone()))
    }

    pub fn contains(&self, id: &CredentialId) -> bool {
        self.credentials.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CredentialSource — the read-only collaborator contract for credentials
// ---------------------------------------------------------------------------

pub trait CredentialSource: Send + Sync {
    fn fetch_credential(&self, id: &CredentialId) -> CredResult<Credential>;
}
