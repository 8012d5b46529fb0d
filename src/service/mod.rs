pub mod emitter;
pub mod filter;
pub mod grouper;
pub mod pipeline;
pub mod scorer;
pub mod selector;

pub use pipeline::DedupService;
