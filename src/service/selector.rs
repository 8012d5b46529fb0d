use std::cmp::Ordering;

use crate::models::{CanonicalRecord, Payload, SelectionReason, TransactionGroup};
use crate::service::scorer;

/// A group resolved to an empty candidate set - structurally impossible, but
/// reported per group rather than aborting the run.
#[derive(Debug)]
pub struct InvariantViolation {
    pub group_key: String,
}

/// Select exactly one canonical payload for a transaction group.
///
/// Total ordering: quality score descending, capture timestamp descending,
/// then scan order ascending as the stable fallback. Ties can never produce a
/// non-deterministic pick. A payload lacking store data is never chosen while
/// a store-tagged alternative exists in the same group.
pub fn select_canonical(group: TransactionGroup) -> Result<CanonicalRecord, InvariantViolation> {
    let member_count = group.member_count();
    let TransactionGroup { key, mut members } = group;

    if members.is_empty() {
        return Err(InvariantViolation {
            group_key: key.to_string(),
        });
    }

    let scored: Vec<f64> = members.iter().map(scorer::quality_score).collect();
    let store_backed = members.iter().any(|p| p.store_id.is_some());

    // candidates surviving the store-data preference
    let candidates: Vec<usize> = (0..members.len())
        .filter(|&idx| !store_backed || members[idx].store_id.is_some())
        .collect();

    let mut winner = candidates[0];
    for &idx in &candidates[1..] {
        if rank(&members[idx], scored[idx], &members[winner], scored[winner]) == Ordering::Greater {
            winner = idx;
        }
    }

    let selection_reason = if members.len() == 1 {
        SelectionReason::SoleRepresentative
    } else if candidates.len() == 1 {
        SelectionReason::StorePreference
    } else {
        // the best-ranked loser decides which criterion separated the winner
        let mut runner = None;
        for &idx in &candidates {
            if idx == winner {
                continue;
            }
            runner = match runner {
                None => Some(idx),
                Some(cur) => {
                    if rank(&members[idx], scored[idx], &members[cur], scored[cur])
                        == Ordering::Greater
                    {
                        Some(idx)
                    } else {
                        Some(cur)
                    }
                }
            };
        }
        let runner = runner.unwrap_or(winner);
        if scored[winner] > scored[runner] {
            SelectionReason::HighestQualityScore
        } else if members[winner].captured_at > members[runner].captured_at {
            SelectionReason::MostRecentCapture
        } else {
            SelectionReason::ScanOrder
        }
    };

    let quality_score = scored[winner];
    let payload = members.swap_remove(winner);

    Ok(CanonicalRecord {
        group_key: key,
        payload,
        quality_score,
        member_count,
        discarded_count: member_count - 1,
        selection_reason,
    })
}

/// Greater means `a` is preferred over `b`
fn rank(a: &Payload, a_score: f64, b: &Payload, b_score: f64) -> Ordering {
    a_score
        .total_cmp(&b_score)
        .then_with(|| a.captured_at.cmp(&b.captured_at))
        .then_with(|| b.scan_order.cmp(&a.scan_order))
}
