use crate::models::Payload;

pub const WEIGHT_HAS_ITEMS: f64 = 4.0;
pub const WEIGHT_ITEM_COUNT: f64 = 2.0;
pub const WEIGHT_COMPLETENESS: f64 = 2.0;
pub const WEIGHT_BYTE_SIZE: f64 = 1.0;

/// Saturation knee for the item-count contribution
const ITEM_COUNT_KNEE: f64 = 8.0;
/// Saturation knee for the byte-size contribution (64 KiB)
const BYTE_SIZE_KNEE: f64 = 65536.0;

/// Composite quality score: weighted sum of the four completeness signals.
///
/// Pure over the payload - no state, no I/O. Capture recency carries its own
/// weight but only as a tie-break, so the selector handles it instead of the
/// composite.
pub fn quality_score(payload: &Payload) -> f64 {
    let q = &payload.quality;
    let has_items = if q.has_items { 1.0 } else { 0.0 };

    WEIGHT_HAS_ITEMS * has_items
        + WEIGHT_ITEM_COUNT * saturating(q.item_count as f64, ITEM_COUNT_KNEE)
        + WEIGHT_COMPLETENESS * q.completeness_score
        + WEIGHT_BYTE_SIZE * saturating(payload.byte_len as f64, BYTE_SIZE_KNEE)
}

/// Monotonic normalization bounded to [0, 1): x / (x + knee)
fn saturating(x: f64, knee: f64) -> f64 {
    x / (x + knee)
}
