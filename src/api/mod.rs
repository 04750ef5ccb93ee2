// src/api/mod.rs

pub mod extract;
pub mod handler;

use crate::models::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use extract::AnalyzeRequest;
pub use handler::{
    all_handler, health_handler, lighthouse_handler, mobile_friendly_handler,
    privacy_tracking_handler, security_headers_handler, tech_stack_handler,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/analyze/lighthouse",
            get(lighthouse_handler).post(lighthouse_handler),
        )
        .route(
            "/analyze/tech-stack",
            get(tech_stack_handler).post(tech_stack_handler),
        )
        .route(
            "/analyze/security-headers",
            get(security_headers_handler).post(security_headers_handler),
        )
        .route(
            "/analyze/mobile-friendly",
            get(mobile_friendly_handler).post(mobile_friendly_handler),
        )
        .route(
            "/analyze/privacy-tracking",
            get(privacy_tracking_handler).post(privacy_tracking_handler),
        )
        .route("/analyze/all", get(all_handler).post(all_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
