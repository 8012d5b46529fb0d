use indexmap::IndexMap;

use crate::models::{GroupKey, Payload, TransactionGroup};

/// Partition payloads into transaction groups by resolved identity.
///
/// Identity-less payloads key on their content hash; after the exact-duplicate
/// filter those are guaranteed singletons. Membership is order-independent -
/// any permutation of the input yields the same partition. Group iteration
/// order follows first appearance so logs stay reproducible.
pub fn group_transactions(payloads: Vec<Payload>) -> Vec<TransactionGroup> {
    let mut groups: IndexMap<GroupKey, Vec<Payload>> = IndexMap::new();
    for payload in payloads {
        let key = match payload.identity.value() {
            Some(id) => GroupKey::Identity(id.to_string()),
            None => GroupKey::ContentHash(payload.content_hash.clone()),
        };
        groups.entry(key).or_default().push(payload);
    }

    groups
        .into_iter()
        .map(|(key, members)| TransactionGroup { key, members })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilteredBlob;
    use crate::models::RawPayloadFile;
    use crate::service::filter::content_hash;
    use chrono::Utc;
    use serde_json::json;
    use std::collections::{BTreeMap, BTreeSet};

    fn payload(body: serde_json::Value, scan_order: usize) -> Payload {
        let bytes = serde_json::to_vec(&body).unwrap();
        let blob = FilteredBlob {
            content_hash: content_hash(&bytes),
            collapsed_copies: 0,
            raw: RawPayloadFile {
                device_id: "scoutpi-0002".into(),
                source_path: format!("p{scan_order}.json"),
                bytes,
                captured_at: Utc::now(),
                scan_order,
            },
        };
        Payload::from_parts(blob, body)
    }

    fn partition(groups: &[TransactionGroup]) -> BTreeMap<String, BTreeSet<usize>> {
        groups
            .iter()
            .map(|g| {
                (
                    g.key.to_string(),
                    g.members.iter().map(|p| p.scan_order).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn same_transaction_id_groups_together() {
        let groups = group_transactions(vec![
            payload(json!({ "transactionId": "T1" }), 0),
            payload(json!({ "transactionId": "T2" }), 1),
            payload(json!({ "transactionId": "T1" }), 2),
        ]);
        assert_eq!(groups.len(), 2);
        let t1 = groups.iter().find(|g| g.key.to_string() == "T1").unwrap();
        assert_eq!(t1.members.len(), 2);
    }

    #[test]
    fn fallback_identities_group_by_resolved_value() {
        let groups = group_transactions(vec![
            payload(json!({ "interaction_id": "X" }), 0),
            payload(json!({ "sessionId": "Y" }), 1),
        ]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn identity_less_payloads_stay_singletons() {
        let groups = group_transactions(vec![
            payload(json!({ "items": [1] }), 0),
            payload(json!({ "items": [2] }), 1),
        ]);
        assert_eq!(groups.len(), 2);
        for g in &groups {
            assert_eq!(g.members.len(), 1);
            assert!(matches!(g.key, GroupKey::ContentHash(_)));
        }
    }

    #[test]
    fn partition_is_order_independent() {
        let build = || {
            vec![
                payload(json!({ "transactionId": "T1", "items": [1] }), 0),
                payload(json!({ "transactionId": "T1", "items": [1, 2] }), 1),
                payload(json!({ "sessionId": "S9" }), 2),
                payload(json!({ "note": "no identity" }), 3),
            ]
        };

        let forward = group_transactions(build());
        let mut reversed_input = build();
        reversed_input.reverse();
        let reversed = group_transactions(reversed_input);

        assert_eq!(partition(&forward), partition(&reversed));
    }

    #[test]
    fn member_count_includes_collapsed_copies() {
        let mut p = payload(json!({ "transactionId": "T1" }), 0);
        p.collapsed_copies = 2;
        let groups = group_transactions(vec![p, payload(json!({ "transactionId": "T1" }), 1)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].member_count(), 4);
    }
}
