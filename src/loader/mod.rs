use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::RawPayloadFile;

/// Result of scanning a payload directory tree
#[derive(Debug, Default)]
pub struct ScanResult {
    pub blobs: Vec<RawPayloadFile>,
    /// files that could not be read at all (I/O failures, not JSON errors)
    pub unreadable: usize,
}

/// Scan a payload root: one subdirectory per device, `*.json` files within.
///
/// Entries are sorted by name so scan order is stable across runs. Unreadable
/// files are tallied, never fatal.
pub fn scan_payload_directory(root: &Path) -> Result<ScanResult, Box<dyn std::error::Error>> {
    tracing::info!("Scanning payload files in {}", root.display());
    let mut result = ScanResult::default();
    let mut scan_order = 0usize;

    for device_dir in sorted_entries(root)? {
        if !device_dir.is_dir() {
            continue;
        }
        let device_id = device_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!("Processing device: {}", device_id);

        for path in sorted_entries(&device_dir)? {
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_payload_file(&path, &device_id, scan_order) {
                Ok(blob) => {
                    result.blobs.push(blob);
                    scan_order += 1;
                }
                Err(e) => {
                    tracing::error!("Error reading {}: {}", path.display(), e);
                    result.unreadable += 1;
                }
            }
        }
    }

    tracing::info!(
        "Scan complete: {} payload files, {} unreadable",
        result.blobs.len(),
        result.unreadable
    );
    Ok(result)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    Ok(entries)
}

fn read_payload_file(
    path: &Path,
    device_id: &str,
    scan_order: usize,
) -> Result<RawPayloadFile, std::io::Error> {
    let bytes = fs::read(path)?;
    let modified = fs::metadata(path)?.modified()?;
    let captured_at: DateTime<Utc> = modified.into();

    Ok(RawPayloadFile {
        device_id: device_id.to_string(),
        source_path: path.display().to_string(),
        bytes,
        captured_at,
        scan_order,
    })
}
