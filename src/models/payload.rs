use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw payload blob handed over by the loader (or an external staging collaborator)
#[derive(Debug, Clone)]
pub struct RawPayloadFile {
    pub device_id: String,
    pub source_path: String,
    pub bytes: Vec<u8>,
    pub captured_at: DateTime<Utc>,
    pub scan_order: usize,
}

/// Survivor of the exact-duplicate filter, not yet parsed
#[derive(Debug, Clone)]
pub struct FilteredBlob {
    pub raw: RawPayloadFile,
    pub content_hash: String,
    /// byte-identical copies collapsed into this blob
    pub collapsed_copies: usize,
}

/// Resolved transaction identity - computed once per payload, never re-probed downstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identity {
    Transaction(String),
    Interaction(String),
    Session(String),
    None,
}

impl Identity {
    /// Probe identity fields in fallback order: transaction, then interaction, then session.
    /// Values are trimmed; empty strings count as absent.
    pub fn resolve(data: &Value) -> Self {
        if let Some(id) = id_field(data, &["transactionId", "transaction_id"]) {
            return Identity::Transaction(id);
        }
        if let Some(id) = id_field(data, &["interactionId", "interaction_id"]) {
            return Identity::Interaction(id);
        }
        if let Some(id) = id_field(data, &["sessionId", "session_id"]) {
            return Identity::Session(id);
        }
        Identity::None
    }

    /// The resolved identity value, if any tier matched
    pub fn value(&self) -> Option<&str> {
        match self {
            Identity::Transaction(v) | Identity::Interaction(v) | Identity::Session(v) => Some(v),
            Identity::None => None,
        }
    }
}

/// Completeness signals over the fixed expected top-level field list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub has_items: bool,
    pub item_count: usize,
    pub has_transaction_data: bool,
    pub has_timestamp: bool,
    pub has_store_data: bool,
    pub completeness_score: f64,
}

impl QualityMetrics {
    /// Derive the four completeness signals from a parsed payload document.
    /// The completeness score is the fraction of expected signals present.
    pub fn from_value(data: &Value) -> Self {
        let item_count = data
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.len())
            .unwrap_or(0);
        let has_items = item_count > 0;
        let has_transaction_data = field_present(data, &["transaction", "totals"]);
        let has_timestamp = field_present(data, &["timestamp", "createdAt"]);
        let has_store_data = field_present(data, &["storeId", "store_id"]);

        let signals = [has_items, has_transaction_data, has_timestamp, has_store_data];
        let completeness_score =
            signals.iter().filter(|present| **present).count() as f64 / signals.len() as f64;

        Self {
            has_items,
            item_count,
            has_transaction_data,
            has_timestamp,
            has_store_data,
            completeness_score,
        }
    }
}

/// Parsed payload surviving the exact-duplicate filter. Immutable for the rest of the run.
#[derive(Debug, Clone, Serialize)]
pub struct Payload {
    pub device_id: String,
    pub source_path: String,
    pub content_hash: String,
    pub byte_len: u64,
    pub captured_at: DateTime<Utc>,
    pub scan_order: usize,
    /// byte-identical copies collapsed into this payload upstream
    pub collapsed_copies: usize,
    pub identity: Identity,
    pub store_id: Option<String>,
    pub quality: QualityMetrics,
    pub data: Value,
}

impl Payload {
    /// Build a payload from a filtered blob and its parsed document
    pub fn from_parts(blob: FilteredBlob, data: Value) -> Self {
        let identity = Identity::resolve(&data);
        let quality = QualityMetrics::from_value(&data);
        let store_id = id_field(&data, &["storeId", "store_id"]);

        Self {
            device_id: blob.raw.device_id,
            source_path: blob.raw.source_path,
            content_hash: blob.content_hash,
            byte_len: blob.raw.bytes.len() as u64,
            captured_at: blob.raw.captured_at,
            scan_order: blob.raw.scan_order,
            collapsed_copies: blob.collapsed_copies,
            identity,
            store_id,
            quality,
            data,
        }
    }

    /// Member weight including byte-identical copies collapsed upstream
    pub fn member_weight(&self) -> usize {
        1 + self.collapsed_copies
    }
}

/// First non-empty identifier among the given field names; accepts strings and numbers
fn id_field(data: &Value, names: &[&str]) -> Option<String> {
    for name in names {
        match data.get(*name) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// True when any of the given top-level fields is present and non-null
fn field_present(data: &Value, names: &[&str]) -> bool {
    names
        .iter()
        .any(|name| matches!(data.get(*name), Some(v) if !v.is_null()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identity_prefers_transaction_id() {
        let data = json!({
            "transactionId": "T1",
            "interactionId": "I1",
            "sessionId": "S1"
        });
        assert_eq!(Identity::resolve(&data), Identity::Transaction("T1".into()));
    }

    #[test]
    fn identity_falls_back_to_interaction_then_session() {
        let data = json!({ "interaction_id": "I1", "sessionId": "S1" });
        assert_eq!(Identity::resolve(&data), Identity::Interaction("I1".into()));

        let data = json!({ "session_id": "S1" });
        assert_eq!(Identity::resolve(&data), Identity::Session("S1".into()));
    }

    #[test]
    fn identity_trims_and_skips_empty_values() {
        let data = json!({ "transactionId": "  T1  " });
        assert_eq!(Identity::resolve(&data), Identity::Transaction("T1".into()));

        let data = json!({ "transactionId": "   ", "sessionId": "S1" });
        assert_eq!(Identity::resolve(&data), Identity::Session("S1".into()));
    }

    #[test]
    fn identity_accepts_numeric_ids() {
        let data = json!({ "transactionId": 42 });
        assert_eq!(Identity::resolve(&data), Identity::Transaction("42".into()));
    }

    #[test]
    fn identity_absent_when_no_keys_match() {
        let data = json!({ "foo": "bar" });
        assert_eq!(Identity::resolve(&data), Identity::None);
        assert_eq!(Identity::resolve(&data).value(), None);
    }

    #[test]
    fn completeness_counts_present_signals() {
        let data = json!({
            "items": [{ "productName": "A" }],
            "timestamp": "2025-06-01T00:00:00Z",
            "storeId": "104"
        });
        let q = QualityMetrics::from_value(&data);
        assert!(q.has_items);
        assert_eq!(q.item_count, 1);
        assert!(!q.has_transaction_data);
        assert!(q.has_timestamp);
        assert!(q.has_store_data);
        assert!((q.completeness_score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn empty_items_array_does_not_count() {
        let data = json!({ "items": [] });
        let q = QualityMetrics::from_value(&data);
        assert!(!q.has_items);
        assert_eq!(q.item_count, 0);
        assert_eq!(q.completeness_score, 0.0);
    }

    #[test]
    fn null_fields_count_as_absent() {
        let data = json!({ "storeId": null, "totals": null });
        let q = QualityMetrics::from_value(&data);
        assert!(!q.has_store_data);
        assert!(!q.has_transaction_data);
    }
}
