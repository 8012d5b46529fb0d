use serde::Serialize;
use std::fmt;

use super::Payload;

/// Key a payload's transaction group resolves under.
/// Identity-less payloads key on their content hash and stay singletons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum GroupKey {
    Identity(String),
    ContentHash(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Identity(v) => write!(f, "{}", v),
            GroupKey::ContentHash(h) => write!(f, "hash:{}", h),
        }
    }
}

/// All payloads resolved to the same logical transaction
#[derive(Debug, Clone)]
pub struct TransactionGroup {
    pub key: GroupKey,
    pub members: Vec<Payload>,
}

impl TransactionGroup {
    /// Total member count, including byte-identical copies collapsed upstream
    pub fn member_count(&self) -> usize {
        self.members.iter().map(Payload::member_weight).sum()
    }
}
