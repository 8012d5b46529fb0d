use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// root directory holding one subdirectory per device
    pub payload_dir: String,
    /// optional canonical-record CSV written after each run
    pub export_csv_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            pipeline: PipelineConfig {
                payload_dir: "./payloads".to_string(),
                export_csv_path: None,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            pipeline: PipelineConfig {
                payload_dir: std::env::var("PAYLOAD_DIR")
                    .unwrap_or_else(|_| "./payloads".to_string()),
                export_csv_path: std::env::var("EXPORT_CSV_PATH").ok(),
            },
        }
    }
}
