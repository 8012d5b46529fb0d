use crate::config::AppConfig;
use crate::export;
use crate::models::RunReport;
use crate::service::DedupService;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Shared handler state: the pipeline service plus configured defaults
#[derive(Clone)]
pub struct DedupState {
    pub service: Arc<DedupService>,
    pub config: AppConfig,
}

/// Request body: optional per-run overrides of the configured defaults
#[derive(Debug, Default, Deserialize)]
pub struct DedupRunRequest {
    pub payload_dir: Option<String>,
    pub export_csv_path: Option<String>,
}

/// Response body
#[derive(Debug, Serialize)]
pub struct DedupRunResponse {
    pub success: bool,
    pub message: String,
    pub report: Option<RunReport>,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Run the dedup pipeline over a payload directory and report the tallies
pub async fn run_dedup(
    State(state): State<DedupState>,
    Json(req): Json<DedupRunRequest>,
) -> Response {
    let payload_dir = req
        .payload_dir
        .unwrap_or_else(|| state.config.pipeline.payload_dir.clone());
    let export_path = req
        .export_csv_path
        .or_else(|| state.config.pipeline.export_csv_path.clone());

    match state.service.run_directory(Path::new(&payload_dir)) {
        Ok(outcome) => {
            if let Some(path) = export_path {
                if let Err(e) = export::write_canonical_csv(Path::new(&path), &outcome.records) {
                    tracing::error!("CSV export failed: {}", e);
                }
            }

            let response = DedupRunResponse {
                success: true,
                message: format!(
                    "Deduplicated {} files into {} canonical records",
                    outcome.report.files_scanned, outcome.report.canonical_count
                ),
                report: Some(outcome.report),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = DedupRunResponse {
                success: false,
                message: format!("Error: {}", e),
                report: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}
