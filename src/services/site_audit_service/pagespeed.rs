use crate::config::PAGESPEED_API_KEY_VAR;
use crate::error::AnalysisFailure;
use crate::models::AppState;
use log::{info, warn};
use reqwest::StatusCode;
use serde_json::Value;

pub const PAGESPEED: &str = "pagespeed";

const CATEGORIES: [&str; 4] = ["performance", "accessibility", "best-practices", "seo"];

/// Fetches a mobile-strategy PageSpeed Insights run for `url`.
pub async fn run_pagespeed(state: &AppState, url: &str) -> Result<Value, AnalysisFailure> {
    let key = state
        .config
        .pagespeed_api_key
        .as_deref()
        .ok_or(AnalysisFailure::MissingApiKey(PAGESPEED_API_KEY_VAR))?;

    let mut query: Vec<(&str, &str)> = vec![("url", url), ("strategy", "mobile"), ("key", key)];
    query.extend(CATEGORIES.iter().map(|c| ("category", *c)));

    info!("Requesting PageSpeed Insights for {}", url);
    let response = state
        .http_client
        .get(&state.config.pagespeed_endpoint)
        .query(&query)
        .timeout(state.config.pagespeed_timeout)
        .send()
        .await
        .map_err(|e| request_failure(PAGESPEED, state.config.pagespeed_timeout.as_secs(), e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| request_failure(PAGESPEED, state.config.pagespeed_timeout.as_secs(), e))?;
    classify_pagespeed_response(status, &body)
}

/// Maps an HTTP status and body from the PageSpeed API to a report or a failure kind.
pub fn classify_pagespeed_response(status: StatusCode, body: &str) -> Result<Value, AnalysisFailure> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if status.is_success() {
        return parsed.ok_or_else(|| {
            AnalysisFailure::InvalidStructure("PageSpeed returned a non-JSON body".to_string())
        });
    }

    let message = parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    warn!("PageSpeed answered {}: {}", status, message);

    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(AnalysisFailure::ApiQuotaExceeded),
        StatusCode::FORBIDDEN if message.to_lowercase().contains("quota") => {
            Err(AnalysisFailure::ApiQuotaExceeded)
        }
        StatusCode::BAD_REQUEST => Err(AnalysisFailure::InvalidRequest(message)),
        _ => Err(AnalysisFailure::ProviderFailed {
            tool: PAGESPEED.to_string(),
            message,
        }),
    }
}

/// Shared mapping for outbound HTTP errors. The request URL is stripped first
/// because the PageSpeed query string carries the API key.
pub fn request_failure(tool: &str, secs: u64, error: reqwest::Error) -> AnalysisFailure {
    let error = error.without_url();
    if error.is_timeout() {
        AnalysisFailure::Timeout {
            tool: tool.to_string(),
            secs,
        }
    } else if error.is_connect() {
        AnalysisFailure::ConnectionRefused(error.to_string())
    } else {
        AnalysisFailure::ProviderFailed {
            tool: tool.to_string(),
            message: error.to_string(),
        }
    }
}
