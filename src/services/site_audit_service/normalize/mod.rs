// src/services/site_audit_service/normalize/mod.rs
//
// Raw Lighthouse JSON -> NormalizedReport. Pure functions, no I/O.

pub mod issues;
pub mod screenshots;
pub mod suggestions;

use crate::error::{AnalysisFailure, DEFAULT_RUNTIME_ERROR_MESSAGE};
use crate::models::lighthouse::{
    Audit, AuditMap, Categories, Category, CategoryScores, LighthouseResult, Metrics, NormalizedReport,
    Resources, NOT_AVAILABLE,
};
use log::{debug, warn};
use serde_json::Value;

pub use issues::extract_issues;
pub use screenshots::{dedup_screenshots, extract_screenshots};
pub use suggestions::extract_suggestions;

/// Markers of a browser error page inside the final screenshot payload. None of
/// them can occur in plain base64, so a real screenshot never trips them.
pub const INTERSTITIAL_MARKERS: &[&str] = &[
    "chrome-error://chromewebdata",
    "net::ERR_",
    "interstitial-wrapper",
];

/// How much a provider's report is trusted to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportProfile {
    /// Lighthouse CLI output.
    Full,
    /// PageSpeed Insights output.
    Restricted,
}

impl ReportProfile {
    pub fn suggestion_limit(&self) -> usize {
        match self {
            ReportProfile::Full => 10,
            ReportProfile::Restricted => 5,
        }
    }
}

/// Provider score in [0,1] to an integer in [0,100].
pub fn to_score(score: f64) -> u8 {
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn normalize_performance_report(
    raw: &Value,
    url: &str,
) -> Result<NormalizedReport, AnalysisFailure> {
    normalize_performance_report_with(raw, url, ReportProfile::Full)
}

pub fn normalize_performance_report_with(
    raw: &Value,
    url: &str,
    profile: ReportProfile,
) -> Result<NormalizedReport, AnalysisFailure> {
    let result = LighthouseResult::from_value(raw)?;

    if let Some(runtime_error) = &result.runtime_error {
        let message = runtime_error
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RUNTIME_ERROR_MESSAGE.to_string());
        warn!("Lighthouse runtime error for {}: {}", url, message);
        return Err(AnalysisFailure::RuntimeError(message));
    }

    if let Some(audits) = &result.audits {
        if shows_interstitial(audits) {
            warn!("Browser error page captured for {}", url);
            return Err(AnalysisFailure::InterstitialError);
        }
    }

    let (categories, audits) = match (&result.categories, &result.audits) {
        (Some(categories), Some(audits)) => (categories, audits),
        (None, _) => {
            return Err(AnalysisFailure::InvalidStructure(
                "missing categories".to_string(),
            ))
        }
        (_, None) => {
            return Err(AnalysisFailure::InvalidStructure(
                "missing audits".to_string(),
            ))
        }
    };

    let category_scores = extract_category_scores(categories);
    if category_scores.is_empty() {
        return Err(AnalysisFailure::NoValidScores);
    }

    let screenshots = extract_screenshots(result.screenshots, result.filmstrip, Some(audits));
    debug!(
        "Normalized {} audits for {} ({} screenshots)",
        audits.len(),
        url,
        screenshots.len()
    );

    Ok(NormalizedReport {
        url: url.to_string(),
        category_scores,
        metrics: extract_metrics(audits),
        resources: extract_resources(audits),
        suggestions: extract_suggestions(audits, profile.suggestion_limit()),
        issues_by_category: extract_issues(audits),
        screenshots,
    })
}

/// Only the final-screenshot audit is inspected.
pub fn shows_interstitial(audits: &AuditMap) -> bool {
    audits
        .get("final-screenshot")
        .and_then(|a| a.details.as_ref())
        .and_then(|d| d.get("data"))
        .and_then(Value::as_str)
        .is_some_and(|data| INTERSTITIAL_MARKERS.iter().any(|m| data.contains(m)))
}

pub fn extract_category_scores(categories: &Categories) -> CategoryScores {
    let score = |c: &Option<Category>| Categories::score_of(c).map(to_score);
    CategoryScores {
        performance: score(&categories.performance),
        accessibility: score(&categories.accessibility),
        best_practices: score(&categories.best_practices),
        seo: score(&categories.seo),
        pwa: score(&categories.pwa),
    }
}

pub fn extract_metrics(audits: &AuditMap) -> Metrics {
    let display = |key: &str| {
        audits
            .get(key)
            .and_then(|a| a.display_value.clone())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    Metrics {
        first_contentful_paint: display("first-contentful-paint"),
        speed_index: display("speed-index"),
        largest_contentful_paint: display("largest-contentful-paint"),
        time_to_interactive: display("interactive"),
        total_blocking_time: display("total-blocking-time"),
        cumulative_layout_shift: display("cumulative-layout-shift"),
    }
}

/// Prefers `resource-summary`; falls back to counting `network-requests`.
pub fn extract_resources(audits: &AuditMap) -> Resources {
    if let Some(summary) = audits.get("resource-summary").filter(|a| !a.details_items().is_empty()) {
        return resources_from_summary(summary);
    }
    if let Some(requests) = audits.get("network-requests") {
        return resources_from_requests(requests);
    }
    Resources::default()
}

fn resources_from_summary(summary: &Audit) -> Resources {
    let mut resources = Resources::default();
    for item in summary.details_items() {
        let count = item.get("requestCount").and_then(Value::as_u64).unwrap_or(0);
        match item.get("resourceType").and_then(Value::as_str) {
            Some("total") => {
                resources.total_requests = count;
                resources.total_size = item.get("transferSize").and_then(Value::as_u64).unwrap_or(0);
            }
            Some("image") => resources.image_count = count,
            Some("script") => resources.script_count = count,
            Some("stylesheet") => resources.stylesheet_count = count,
            Some("font") => resources.font_count = count,
            _ => {}
        }
    }
    resources
}

fn resources_from_requests(requests: &Audit) -> Resources {
    let mut resources = Resources::default();
    for item in requests.details_items() {
        resources.total_requests += 1;
        resources.total_size += item.get("transferSize").and_then(Value::as_u64).unwrap_or(0);
        match item
            .get("resourceType")
            .and_then(Value::as_str)
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("image") => resources.image_count += 1,
            Some("script") => resources.script_count += 1,
            Some("stylesheet") => resources.stylesheet_count += 1,
            Some("font") => resources.font_count += 1,
            _ => {}
        }
    }
    resources
}
