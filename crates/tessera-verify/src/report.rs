//! The verification report.
//!
//! One entry per level, statuses decided only here at the orchestration
//! layer. Renders as JSON (serde) for machines and as plain text
//! (`Display`) for humans.

use serde::{Deserialize, Serialize};
use std::fmt;

use tessera_core::{IdentifierId, Timestamp};

// ---------------------------------------------------------------------------
// CheckLevel — the ordered verification levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckLevel {
    Reference,
    DelegationSeal,
    WitnessConsensus,
    TrustChain,
    StateConsistency,
}

impl CheckLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckLevel::Reference => "reference",
            CheckLevel::DelegationSeal => "delegation_seal",
            CheckLevel::WitnessConsensus => "witness_consensus",
            CheckLevel::TrustChain => "trust_chain",
            CheckLevel::StateConsistency => "state_consistency",
        }
    }
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warn,
    /// A prerequisite failed or the input for this level was not
    /// supplied; the check was not attempted.
    Skipped,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
            CheckStatus::Warn => "warn",
            CheckStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub level: CheckLevel,
    pub status: CheckStatus,
    /// Human-readable explanation of what was checked and what was found.
    pub detail: String,
    /// The raw values involved in any mismatch, for diagnosis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// The delegate identifier this run verified.
    pub identifier: IdentifierId,
    pub generated_at: Timestamp,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(identifier: IdentifierId) -> Self {
        Self {
            identifier,
            generated_at: Timestamp::now(),
            entries: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        level: CheckLevel,
        status: CheckStatus,
        detail: impl Into<String>,
        values: Option<serde_json::Value>,
    ) {
        let detail = detail.into();
        tracing::info!(level = %level, status = %status, detail = %detail, "verification level");
        self.entries.push(ReportEntry {
            level,
            status,
            detail,
            values,
        });
    }

    pub fn pass(&mut self, level: CheckLevel, detail: impl Into<String>) {
        self.push(level, CheckStatus::Pass, detail, None);
    }

    pub fn warn(
        &mut self,
        level: CheckLevel,
        detail: impl Into<String>,
        values: Option<serde_json::Value>,
    ) {
        self.push(level, CheckStatus::Warn, detail, values);
    }

    pub fn fail(
        &mut self,
        level: CheckLevel,
        detail: impl Into<String>,
        values: Option<serde_json::Value>,
    ) {
        self.push(level, CheckStatus::Fail, detail, values);
    }

    pub fn skip(&mut self, level: CheckLevel, detail: impl Into<String>) {
        self.push(level, CheckStatus::Skipped, detail, None);
    }

    /// No level failed. Warnings and skipped levels do not count
    /// against a pass; they are visible in the entries.
    pub fn passed(&self) -> bool {
        !self
            .entries
            .iter()
            .any(|e| e.status == CheckStatus::Fail)
    }

    pub fn status_of(&self, level: CheckLevel) -> Option<CheckStatus> {
        self.entries
            .iter()
            .find(|e| e.level == level)
            .map(|e| e.status)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "verification of {} at {}",
            self.identifier,
            self.generated_at.to_rfc3339()
        )?;
        for entry in &self.entries {
            writeln!(f, "  [{}] {}: {}", entry.status, entry.level, entry.detail)?;
        }
        write!(
            f,
            "result: {}",
            if self.passed() { "PASSED" } else { "FAILED" }
        )
    }
}
