use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_RUNTIME_ERROR_MESSAGE: &str = "site may be down or inaccessible";

/// Every way an analysis can fail, from the provider run itself to report normalization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisFailure {
    /// The provider ran but the target page failed to load.
    #[error("{0}")]
    RuntimeError(String),

    /// The provider captured a browser error page instead of the site.
    #[error("browser error page detected, the site could not be rendered")]
    InterstitialError,

    #[error("invalid report structure: {0}")]
    InvalidStructure(String),

    #[error("no valid category scores in report")]
    NoValidScores,

    #[error("{0} is not installed or not on PATH")]
    ToolNotFound(String),

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("API quota exceeded, try again later")]
    ApiQuotaExceeded,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{tool} failed: {message}")]
    ProviderFailed { tool: String, message: String },

    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    /// Unexpected failure, converted at the orchestrator boundary.
    #[error("analysis of {url} failed: {message}")]
    Internal { url: String, message: String },
}

impl AnalysisFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisFailure::RuntimeError(_) => "runtime_error",
            AnalysisFailure::InterstitialError => "interstitial_error",
            AnalysisFailure::InvalidStructure(_) => "invalid_structure",
            AnalysisFailure::NoValidScores => "no_valid_scores",
            AnalysisFailure::ToolNotFound(_) => "tool_not_found",
            AnalysisFailure::Timeout { .. } => "timeout",
            AnalysisFailure::ConnectionRefused(_) => "connection_refused",
            AnalysisFailure::ApiQuotaExceeded => "api_quota_exceeded",
            AnalysisFailure::InvalidRequest(_) => "invalid_request",
            AnalysisFailure::ProviderFailed { .. } => "provider_failed",
            AnalysisFailure::MissingApiKey(_) => "missing_api_key",
            AnalysisFailure::Internal { .. } => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisFailure::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AnalysisFailure::RuntimeError(_)
            | AnalysisFailure::InterstitialError
            | AnalysisFailure::InvalidStructure(_)
            | AnalysisFailure::NoValidScores => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisFailure::ApiQuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            AnalysisFailure::ConnectionRefused(_) | AnalysisFailure::ProviderFailed { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AnalysisFailure::ToolNotFound(_) | AnalysisFailure::MissingApiKey(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AnalysisFailure::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AnalysisFailure::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(url: &str, message: impl Into<String>) -> Self {
        AnalysisFailure::Internal {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: true,
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Wire shape of a failed category: `{ "error": true, "kind": ..., "message": ... }`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: bool,
    pub kind: &'static str,
    pub message: String,
}

impl IntoResponse for AnalysisFailure {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
