use axum::{
    routing::{get, post},
    Router,
};
use scout_dedup_rust::{api, AppConfig, DedupService};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    let state = api::DedupState {
        service: Arc::new(DedupService::new()),
        config: config.clone(),
    };

    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/dedup/run", post(api::run_dedup))
        .with_state(state)
        .layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/dedup/run - deduplicate the payload directory and report tallies");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
