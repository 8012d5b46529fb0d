use std::path::Path;

use crate::models::CanonicalRecord;

/// Write a one-row-per-canonical-record summary CSV.
/// This lives in the serving harness, not the core: the pipeline itself never
/// touches storage.
pub fn write_canonical_csv(
    path: &Path,
    records: &[CanonicalRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "group_key",
        "device_id",
        "store_id",
        "source_path",
        "member_count",
        "discarded_count",
        "quality_score",
        "selection_reason",
    ])?;

    for rec in records {
        writer.write_record([
            rec.group_key.to_string(),
            rec.payload.device_id.clone(),
            rec.payload.store_id.clone().unwrap_or_default(),
            rec.payload.source_path.clone(),
            rec.member_count.to_string(),
            rec.discarded_count.to_string(),
            format!("{:.4}", rec.quality_score),
            rec.selection_reason.to_string(),
        ])?;
    }

    writer.flush()?;
    tracing::info!("Exported {} canonical records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawPayloadFile;
    use crate::service::DedupService;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn writes_header_and_one_row_per_record() {
        let body = json!({ "transactionId": "T1", "items": [1], "storeId": "104" });
        let outcome = DedupService::new().run_blobs(vec![RawPayloadFile {
            device_id: "scoutpi-0001".into(),
            source_path: "p0.json".into(),
            bytes: serde_json::to_vec(&body).unwrap(),
            captured_at: Utc::now(),
            scan_order: 0,
        }]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canonical.csv");
        write_canonical_csv(&path, &outcome.records).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("group_key,device_id"));
        assert!(lines[1].contains("T1"));
        assert!(lines[1].contains("sole representative"));
    }
}
