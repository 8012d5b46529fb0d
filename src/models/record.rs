use serde::Serialize;
use std::fmt;

use super::{GroupKey, Payload};

/// Why a payload won its transaction group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    SoleRepresentative,
    StorePreference,
    HighestQualityScore,
    MostRecentCapture,
    ScanOrder,
}

impl SelectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionReason::SoleRepresentative => "sole representative",
            SelectionReason::StorePreference => "only store-tagged candidate",
            SelectionReason::HighestQualityScore => "highest quality score",
            SelectionReason::MostRecentCapture => "most recent capture",
            SelectionReason::ScanOrder => "first by scan order",
        }
    }
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single payload selected to represent a transaction group
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalRecord {
    pub group_key: GroupKey,
    pub payload: Payload,
    pub quality_score: f64,
    /// total group members, byte-identical copies included
    pub member_count: usize,
    pub discarded_count: usize,
    pub selection_reason: SelectionReason,
}

/// Per-run tallies reported back to the operator.
/// Conservation holds: canonical_count + discarded_count == files_scanned - invalid_payloads.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files_scanned: usize,
    pub exact_duplicates: usize,
    pub invalid_payloads: usize,
    pub group_count: usize,
    pub canonical_count: usize,
    pub discarded_count: usize,
    /// group keys that resolved to an empty candidate set
    pub invariant_violations: Vec<String>,
}

/// Canonical records plus the run report - the sole output toward downstream ETL
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub records: Vec<CanonicalRecord>,
    pub report: RunReport,
}
