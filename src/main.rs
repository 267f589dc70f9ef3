use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edudash::api::router;
use edudash::config::AppConfig;
use edudash::services::CacheSweeper;
use edudash::state::AppState;
use edudash::upstream::HttpTransport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "edudash=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;
    info!("upstream api: {}", config.api_base_url);

    let transport = Arc::new(HttpTransport::new(&config.api_base_url, config.request_timeout)?);
    let state = AppState::new(transport, &config);

    let sweeper = CacheSweeper::new(state.resources.cache().clone(), config.cache_sweep_interval_secs);
    tokio::spawn(sweeper.start());

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
