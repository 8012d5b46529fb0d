use crate::models::{CanonicalRecord, PipelineOutcome, RunReport};

/// Tallies accumulated by the upstream stages
#[derive(Debug, Clone, Copy, Default)]
pub struct StageCounters {
    pub files_scanned: usize,
    pub exact_duplicates: usize,
    pub invalid_payloads: usize,
    pub group_count: usize,
}

/// Assemble the final outcome: one canonical record per group plus the run
/// report. No storage I/O happens here - persistence belongs to the caller.
pub fn emit(
    records: Vec<CanonicalRecord>,
    invariant_violations: Vec<String>,
    counters: StageCounters,
) -> PipelineOutcome {
    let discarded_count = records.iter().map(|r| r.discarded_count).sum();
    let report = RunReport {
        files_scanned: counters.files_scanned,
        exact_duplicates: counters.exact_duplicates,
        invalid_payloads: counters.invalid_payloads,
        group_count: counters.group_count,
        canonical_count: records.len(),
        discarded_count,
        invariant_violations,
    };

    tracing::info!(
        "Dedup complete: {} scanned, {} invalid, {} exact duplicates, {} discarded, {} canonical",
        report.files_scanned,
        report.invalid_payloads,
        report.exact_duplicates,
        report.discarded_count,
        report.canonical_count
    );

    PipelineOutcome { records, report }
}
