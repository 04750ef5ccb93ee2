use crate::api::extract::AnalyzeRequest;
use crate::error::AnalysisFailure;
use crate::models::{Analyzed, AppState};
use crate::services::{
    analyze_all, analyze_lighthouse, analyze_mobile_friendly, analyze_privacy_tracking,
    analyze_security_headers, analyze_tech_stack,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use log::info;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

fn respond<T: Serialize>(result: Result<T, AnalysisFailure>) -> Response {
    match result {
        Ok(report) => (
            StatusCode::OK,
            Json(Analyzed {
                report,
                analyzed_at: Utc::now().to_rfc3339(),
            }),
        )
            .into_response(),
        Err(failure) => failure.into_response(),
    }
}

pub async fn lighthouse_handler(
    State(state): State<Arc<AppState>>,
    AnalyzeRequest(params): AnalyzeRequest,
) -> Response {
    info!("Started lighthouse handler for: {}", params.url);
    respond(analyze_lighthouse(&state, &params.url).await)
}

pub async fn tech_stack_handler(
    State(state): State<Arc<AppState>>,
    AnalyzeRequest(params): AnalyzeRequest,
) -> Response {
    info!("Started tech-stack handler for: {}", params.url);
    respond(analyze_tech_stack(&state, &params.url).await)
}

pub async fn security_headers_handler(
    State(state): State<Arc<AppState>>,
    AnalyzeRequest(params): AnalyzeRequest,
) -> Response {
    info!("Started security-headers handler for: {}", params.url);
    respond(analyze_security_headers(&state, &params.url).await)
}

pub async fn mobile_friendly_handler(
    State(state): State<Arc<AppState>>,
    AnalyzeRequest(params): AnalyzeRequest,
) -> Response {
    info!("Started mobile-friendly handler for: {}", params.url);
    respond(analyze_mobile_friendly(&state, &params.url).await)
}

pub async fn privacy_tracking_handler(
    State(state): State<Arc<AppState>>,
    AnalyzeRequest(params): AnalyzeRequest,
) -> Response {
    info!("Started privacy-tracking handler for: {}", params.url);
    respond(analyze_privacy_tracking(&state, &params.url).await)
}

/// Every category at once. Per-category failures are embedded in the body,
/// so only a bad `url` fails the whole request.
pub async fn all_handler(
    State(state): State<Arc<AppState>>,
    AnalyzeRequest(params): AnalyzeRequest,
) -> Response {
    info!("Started full audit handler for: {}", params.url);
    respond(analyze_all(&state, &params.url).await)
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::ParamsAnalyze;
    use serde_json::Value;

    fn state() -> Arc<AppState> {
        Arc::new(
            AppState::new(Config {
                lighthouse_bin: "/nonexistent/lighthouse".to_string(),
                wappalyzer_bin: "/nonexistent/wappalyzer".to_string(),
                ..Config::default()
            })
            .unwrap(),
        )
    }

    fn request(url: &str) -> AnalyzeRequest {
        AnalyzeRequest(ParamsAnalyze {
            url: url.to_string(),
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_lighthouse_is_service_unavailable() {
        let response = lighthouse_handler(State(state()), request("https://example.com")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"], true);
        assert_eq!(body["kind"], "tool_not_found");
    }

    #[tokio::test]
    async fn empty_url_is_bad_request() {
        let response = security_headers_handler(State(state()), request("")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "invalid_request");
    }

    #[tokio::test]
    async fn mobile_friendly_without_key_is_service_unavailable() {
        let response = mobile_friendly_handler(State(state()), request("example.com")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "missing_api_key");
        assert_eq!(body["message"], "PAGESPEED_API_KEY is not set");
    }

    #[tokio::test]
    async fn success_is_stamped_with_analyzed_at() {
        let response = respond::<Value>(Ok(json!({ "url": "https://example.com" })));
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["url"], "https://example.com");
        assert!(body["analyzedAt"].is_string());
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(body) = health_handler().await;
        assert_eq!(body["status"], "ok");
    }
}
