//! Scatter/gather receipt collection with early termination.
//!
//! One query per configured witness, issued in parallel. Receipts are
//! accumulated as they arrive and the gather stops as soon as either
//! the threshold is reached (success) or it becomes mathematically
//! impossible to reach it (fast failure: more witnesses have
//! definitively failed or timed out than the pool can spare).
//!
//! A per-witness timeout is a non-fatal absence — witnesses may
//! legitimately be slow. The overall deadline bounds the gather as a
//! whole; exceeding it yields an unsatisfied result with the partial
//! count attached, never a silent hang. Cancellation of still-pending
//! queries after the outcome is decided is advisory: a late receipt is
//! simply ignored.
//!
//! No retry policy lives here; retries are a caller-level concern
//! layered above the synchronous counting core.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use tessera_core::{IdentifierId, WitnessConfig, WitnessId};
use tessera_kel::Event;

use crate::error::QuorumError;
use crate::evaluate::{evaluate, QuorumResult};
use crate::receipt::WitnessReceipt;

// ---------------------------------------------------------------------------
// WitnessClient — one async query against one witness
// ---------------------------------------------------------------------------

/// Transport adapter for querying a single witness for its receipt of
/// one event. `Ok(None)` means the witness has no receipt yet — an
/// absence, not an error.
pub trait WitnessClient: Send + Sync {
    fn fetch_receipt(
        &self,
        witness: WitnessId,
        identifier: IdentifierId,
        sequence: u64,
    ) -> impl Future<Output = Result<Option<WitnessReceipt>, QuorumError>> + Send;
}

// ---------------------------------------------------------------------------
// CollectionPolicy — how long to wait, decided by the caller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPolicy {
    /// Budget for each individual witness query. Expiry is an absence,
    /// not an error.
    pub per_witness_timeout: Duration,
    /// Budget for the gather as a whole.
    pub overall_deadline: Duration,
}

impl CollectionPolicy {
    pub fn validate(&self) -> Result<(), QuorumError> {
        if self.per_witness_timeout.is_zero() {
            return Err(QuorumError::InvalidPolicy(
                "per-witness timeout must be non-zero".to_string(),
            ));
        }
        if self.overall_deadline.is_zero() {
            return Err(QuorumError::InvalidPolicy(
                "overall deadline must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CollectionPolicy {
    fn default() -> Self {
        Self {
            per_witness_timeout: Duration::from_secs(3),
            overall_deadline: Duration::from_secs(10),
        }
    }
}

// ---------------------------------------------------------------------------
// collect_receipts
// ---------------------------------------------------------------------------

/// Gather receipts for `event` from every witness in `config`, stopping
/// early on success or mathematical failure, and return the definitive
/// count produced by [`evaluate`] over whatever arrived in time.
pub async fn collect_receipts<C>(
    client: Arc<C>,
    event: &Event,
    config: &WitnessConfig,
    policy: &CollectionPolicy,
) -> Result<QuorumResult, QuorumError>
where
    C: WitnessClient + 'static,
{
    config.validate()?;
    policy.validate()?;

    let total = config.witnesses.len() as u32;
    let threshold = config.threshold;

    let mut tasks = JoinSet::new();
    for witness in &config.witnesses {
        let client = Arc::clone(&client);
        let witness = witness.clone();
        let identifier = event.owner.clone();
        let sequence = event.sequence;
        let per_witness = policy.per_witness_timeout;
        tasks.spawn(async move {
            let outcome = tokio::time::timeout(
                per_witness,
                client.fetch_receipt(witness.clone(), identifier, sequence),
            )
            .await;
            (witness, outcome)
        });
    }

    let deadline = tokio::time::sleep(policy.overall_deadline);
    tokio::pin!(deadline);

    let mut receipts: Vec<WitnessReceipt> = Vec::new();
    let mut counted: BTreeSet<WitnessId> = BTreeSet::new();
    let mut resolved = 0u32;

    loop {
        if counted.len() as u32 >= threshold {
            break;
        }
        // Fast failure: even if every unresolved witness answered
        // favorably, the threshold could no longer be reached.
        if counted.len() as u32 + (total - resolved) < threshold {
            tracing::debug!(
                counted = counted.len(),
                resolved,
                total,
                threshold,
                "quorum mathematically unreachable; stopping early"
            );
            break;
        }

        tokio::select! {
            joined = tasks.join_next() => {
                let Some(joined) = joined else { break };
                resolved += 1;
                match joined {
                    Ok((_witness, Ok(Ok(Some(receipt))))) => {
                        if receipt.event_digest == event.digest
                            && receipt.sequence == event.sequence
                            && config.recognizes(&receipt.witness)
                        {
                            counted.insert(receipt.witness.clone());
                        }
                        // Mismatches still flow into the final evaluation
                        // so the result accounts for them.
                        receipts.push(receipt);
                    }
                    Ok((witness, Ok(Ok(None)))) => {
                        tracing::debug!(witness = %witness, "witness has no receipt yet");
                    }
                    Ok((witness, Ok(Err(err)))) => {
                        tracing::warn!(witness = %witness, error = %err, "witness query failed");
                    }
                    Ok((witness, Err(_elapsed))) => {
                        tracing::debug!(witness = %witness, "witness query timed out");
                    }
                    Err(join_err) => {
                        tracing::warn!(error = %join_err, "witness query task failed");
                    }
                }
            }
            _ = &mut deadline => {
                tracing::warn!(
                    identifier = %event.owner,
                    sequence = event.sequence,
                    counted = counted.len(),
                    threshold,
                    "overall deadline exceeded with partial receipts"
                );
                break;
            }
        }
    }

    // Advisory cancellation: anything still in flight is no longer
    // needed, and a receipt arriving after this point is ignored.
    tasks.abort_all();

    evaluate(event, &receipts, config)
}
