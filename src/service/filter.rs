use indexmap::map::Entry;
use indexmap::IndexMap;
use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::models::{FilteredBlob, RawPayloadFile};

/// sha256 hex digest of the raw payload bytes
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Collapse byte-identical blobs to one representative per digest.
///
/// Hashes are computed in parallel; the index merge is a single-writer pass so
/// two copies of the same blob can never both survive. The representative is
/// the copy with the lowest scan order (the first-encountered one under the
/// loader's natural ordering), which keeps the result permutation-independent.
pub fn filter_exact_duplicates(blobs: Vec<RawPayloadFile>) -> Vec<FilteredBlob> {
    let hashes: Vec<String> = blobs
        .par_iter()
        .map(|blob| content_hash(&blob.bytes))
        .collect();

    let mut survivors: IndexMap<String, FilteredBlob> = IndexMap::with_capacity(blobs.len());
    for (mut raw, hash) in blobs.into_iter().zip(hashes) {
        match survivors.entry(hash.clone()) {
            Entry::Occupied(mut entry) => {
                let survivor = entry.get_mut();
                tracing::debug!(
                    "Exact duplicate of {}: {}",
                    survivor.raw.source_path,
                    raw.source_path
                );
                survivor.collapsed_copies += 1;
                if raw.scan_order < survivor.raw.scan_order {
                    std::mem::swap(&mut survivor.raw, &mut raw);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(FilteredBlob {
                    raw,
                    content_hash: hash,
                    collapsed_copies: 0,
                });
            }
        }
    }

    survivors.into_values().collect()
}
