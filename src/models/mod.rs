pub mod group;
pub mod payload;
pub mod record;

pub use group::{GroupKey, TransactionGroup};
pub use payload::{FilteredBlob, Identity, Payload, QualityMetrics, RawPayloadFile};
pub use record::{CanonicalRecord, PipelineOutcome, RunReport, SelectionReason};
