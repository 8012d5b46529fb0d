use rayon::prelude::*;
use serde_json::Value;
use std::path::Path;

use crate::loader;
use crate::models::{Payload, PipelineOutcome, RawPayloadFile};
use crate::service::emitter::{self, StageCounters};
use crate::service::{filter, grouper, selector};

/// Deduplication pipeline service.
///
/// Single-pass, stateless batch transformation:
/// loader -> exact-duplicate filter -> grouper -> (score x select, per group) -> emitter.
pub struct DedupService;

impl DedupService {
    pub fn new() -> Self {
        Self
    }

    /// Full run over a payload directory tree (one subdirectory per device).
    pub fn run_directory(
        &self,
        payload_dir: &Path,
    ) -> Result<PipelineOutcome, Box<dyn std::error::Error>> {
        let scan = loader::scan_payload_directory(payload_dir)?;
        let unreadable = scan.unreadable;

        let mut outcome = self.run_blobs(scan.blobs);
        // unreadable files never made it into the batch; fold them into the tallies
        outcome.report.files_scanned += unreadable;
        outcome.report.invalid_payloads += unreadable;
        Ok(outcome)
    }

    /// Core batch pass over pre-loaded blobs. Never fails: malformed payloads
    /// are tallied and excluded, isolated bad records never abort the run.
    pub fn run_blobs(&self, blobs: Vec<RawPayloadFile>) -> PipelineOutcome {
        let files_scanned = blobs.len();
        tracing::info!("Pipeline start: {} payload files", files_scanned);

        // 1. collapse exact byte duplicates before any identity grouping
        let filtered = filter::filter_exact_duplicates(blobs);
        let exact_duplicates = files_scanned - filtered.len();

        // 2. parse survivors; a survivor that fails to parse drags its
        //    collapsed byte-copies into the invalid tally with it
        let mut invalid_payloads = 0usize;
        let mut payloads: Vec<Payload> = Vec::with_capacity(filtered.len());
        for blob in filtered {
            match serde_json::from_slice::<Value>(&blob.raw.bytes) {
                Ok(data) => payloads.push(Payload::from_parts(blob, data)),
                Err(e) => {
                    tracing::error!("JSON decode error in {}: {}", blob.raw.source_path, e);
                    invalid_payloads += 1 + blob.collapsed_copies;
                }
            }
        }

        // 3. partition into transaction groups
        let valid_count = payloads.len();
        let groups = grouper::group_transactions(payloads);
        let group_count = groups.len();
        tracing::info!(
            "Grouped {} payloads into {} transaction groups ({} exact duplicates collapsed)",
            valid_count,
            group_count,
            exact_duplicates
        );

        // 4. score and select per group - data-independent fan-out, joined here
        let results: Vec<_> = groups
            .into_par_iter()
            .map(selector::select_canonical)
            .collect();

        let mut records = Vec::with_capacity(group_count);
        let mut invariant_violations = Vec::new();
        for result in results {
            match result {
                Ok(record) => records.push(record),
                Err(violation) => {
                    tracing::error!(
                        "Empty candidate set for group {}, skipping",
                        violation.group_key
                    );
                    invariant_violations.push(violation.group_key);
                }
            }
        }

        // 5. emit
        emitter::emit(
            records,
            invariant_violations,
            StageCounters {
                files_scanned,
                exact_duplicates,
                invalid_payloads,
                group_count,
            },
        )
    }
}

impl Default for DedupService {
    fn default() -> Self {
        Self::new()
    }
}
