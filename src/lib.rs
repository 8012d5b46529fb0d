pub mod api;
pub mod config;
pub mod export;
pub mod loader;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use service::DedupService;
