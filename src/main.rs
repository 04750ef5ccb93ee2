use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};
use std::sync::Arc;

mod api;
mod config;
mod error;
mod models;
mod services;
mod utils;

use config::{Config, PAGESPEED_API_KEY_VAR};
use models::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    utils::init_logging();

    let config = Config::from_env().context("Failed to read configuration")?;
    if config.pagespeed_api_key.is_none() {
        warn!(
            "{} is not set, mobile-friendly analysis will be unavailable",
            PAGESPEED_API_KEY_VAR
        );
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config).context("Failed to build HTTP client")?;
    let app = api::router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("🚀 Server running on http://{}", bind_addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
