//! Breadth-first trust chain traversal.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use tessera_core::CredentialId;

use crate::edge::{validate_edge, DelegationResolver, EdgeFailure};
use crate::error::{CredError, CredResult};
use crate::types::CredentialGraph;

// ---------------------------------------------------------------------------
// ChainValidation
// ---------------------------------------------------------------------------

/// Where and how a chain broke. `hop` counts edges from the leaf:
/// the leaf's own edges are hop 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFailure {
    pub hop: usize,
    pub child: CredentialId,
    pub edge_name: String,
    pub parent: CredentialId,
    pub reason: EdgeFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainValidation {
    pub valid: bool,
    /// Credentials whose edges all validated, in traversal order.
    /// Credentials beyond a failure are never listed — they were
    /// skipped, not passed.
    pub path: Vec<CredentialId>,
    /// Edge-less credentials the walk terminated at.
    pub roots: Vec<CredentialId>,
    pub failure: Option<ChainFailure>,
}

/// Walk the graph from `leaf` toward the root(s), validating every
/// declared edge at each hop.
///
/// Fails fast: the first invalid edge ends the walk and invalidates the
/// chain. Dangling parent references and graphs whose every route loops
/// back on themselves are structural errors, distinct from an invalid
/// chain.
pub fn walk(
    leaf: &CredentialId,
    graph: &CredentialGraph,
    resolver: &dyn DelegationResolver,
) -> CredResult<ChainValidation> {
    let mut queue: VecDeque<(CredentialId, usize)> = VecDeque::new();
    let mut enqueued: BTreeSet<CredentialId> = BTreeSet::new();
    let mut path: Vec<CredentialId> = Vec::new();
    let mut roots: Vec<CredentialId> = Vec::new();

    queue.push_back((leaf.clone(), 0));
    enqueued.insert(leaf.clone());

    while let Some((id, depth)) = queue.pop_front() {
        let credential = graph.get(&id)?;
        path.push(id.clone());

        if credential.is_root() {
            roots.push(id);
            continue;
        }

        for (edge_name, edge) in &credential.edges {
            let parent = graph.get(&edge.parent)?;
            let validation = validate_edge(credential, edge_name, parent, resolver);
            if let Some(reason) = validation.failure {
                tracing::debug!(
                    leaf = %leaf,
                    child = %id,
                    edge = %edge_name,
                    hop = depth + 1,
                    "trust chain broken"
                );
                return Ok(ChainValidation {
                    valid: false,
                    path,
                    roots,
                    failure: Some(ChainFailure {
                        hop: depth + 1,
                        child: id.clone(),
                        edge_name: edge_name.clone(),
                        parent: edge.parent.clone(),
                        reason,
                    }),
                });
            }
            // A parent reachable along two routes is validated once.
            if enqueued.insert(edge.parent.clone()) {
                queue.push_back((edge.parent.clone(), depth + 1));
            }
        }
    }

    // Every walk must terminate at a root; a rootless traversal means
    // the reachable graph is one big loop.
    if roots.is_empty() {
        return Err(CredError::GraphCycle(leaf.clone()));
    }

    tracing::debug!(
        leaf = %leaf,
        hops = path.len(),
        roots = roots.len(),
        "trust chain valid"
    );

    Ok(ChainValidation {
        valid: true,
        path,
        roots,
        failure: None,
    })
}
