use crate::error::AnalysisFailure;
use crate::models::lighthouse::audit::AuditMap;
use crate::models::lighthouse::category::{Categories, CategoryScores};
use crate::models::lighthouse::screenshot::Screenshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RuntimeError {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Typed view over a raw Lighthouse JSON document. Every field is optional;
/// the normalizer decides what a missing piece means.
#[derive(Debug, Clone, Default)]
pub struct LighthouseResult<'a> {
    pub requested_url: Option<&'a str>,
    pub runtime_error: Option<RuntimeError>,
    pub categories: Option<Categories>,
    pub audits: Option<AuditMap>,
    pub screenshots: Option<&'a [Value]>,
    pub filmstrip: Option<&'a [Value]>,
}

impl<'a> LighthouseResult<'a> {
    pub fn from_value(raw: &'a Value) -> Result<Self, AnalysisFailure> {
        let object = raw.as_object().ok_or_else(|| {
            AnalysisFailure::InvalidStructure("report is not a JSON object".to_string())
        })?;

        // Older Lighthouse versions always emit runtimeError, with code NO_ERROR on success.
        let runtime_error = match object.get("runtimeError") {
            None | Some(Value::Null) => None,
            Some(value) => Some(RuntimeError::deserialize(value).unwrap_or_default())
                .filter(|e| e.code.as_deref() != Some("NO_ERROR")),
        };

        let categories = match object.get("categories") {
            Some(value @ Value::Object(_)) => Some(Categories::deserialize(value).map_err(|e| {
                AnalysisFailure::InvalidStructure(format!("malformed categories: {}", e))
            })?),
            _ => None,
        };

        let audits = object
            .get("audits")
            .and_then(Value::as_object)
            .map(AuditMap::from_object);

        Ok(LighthouseResult {
            requested_url: object.get("requestedUrl").and_then(Value::as_str),
            runtime_error,
            categories,
            audits,
            screenshots: object
                .get("screenshots")
                .and_then(Value::as_array)
                .map(Vec::as_slice),
            filmstrip: object
                .get("filmstrip")
                .and_then(Value::as_array)
                .map(Vec::as_slice),
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub first_contentful_paint: String,
    pub speed_index: String,
    pub largest_contentful_paint: String,
    pub time_to_interactive: String,
    pub total_blocking_time: String,
    pub cumulative_layout_shift: String,
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics {
            first_contentful_paint: NOT_AVAILABLE.to_string(),
            speed_index: NOT_AVAILABLE.to_string(),
            largest_contentful_paint: NOT_AVAILABLE.to_string(),
            time_to_interactive: NOT_AVAILABLE.to_string(),
            total_blocking_time: NOT_AVAILABLE.to_string(),
            cumulative_layout_shift: NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    pub total_requests: u64,
    pub total_size: u64,
    pub image_count: u64,
    pub script_count: u64,
    pub stylesheet_count: u64,
    pub font_count: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Opportunity,
    Diagnostic,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub score: u8,
    pub savings: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub score: u8,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct IssuesByCategory {
    pub accessibility: Vec<Issue>,
    #[serde(rename = "best-practices")]
    pub best_practices: Vec<Issue>,
    pub seo: Vec<Issue>,
}

/// The stable report shape handed to API callers.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReport {
    pub url: String,
    pub category_scores: CategoryScores,
    pub metrics: Metrics,
    pub resources: Resources,
    pub suggestions: Vec<Suggestion>,
    pub issues_by_category: IssuesByCategory,
    pub screenshots: Vec<Screenshot>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_runtime_error_is_absent() {
        let raw = json!({ "runtimeError": null, "categories": {}, "audits": {} });
        let result = LighthouseResult::from_value(&raw).unwrap();
        assert!(result.runtime_error.is_none());
        assert!(result.categories.is_some());
        assert!(result.audits.is_some());
    }

    #[test]
    fn no_error_code_is_not_a_runtime_error() {
        let raw = json!({ "runtimeError": { "code": "NO_ERROR", "message": "" } });
        let result = LighthouseResult::from_value(&raw).unwrap();
        assert!(result.runtime_error.is_none());
    }

    #[test]
    fn non_object_sections_count_as_missing() {
        let raw = json!({ "categories": [], "audits": "none" });
        let result = LighthouseResult::from_value(&raw).unwrap();
        assert!(result.categories.is_none());
        assert!(result.audits.is_none());
    }

    #[test]
    fn non_object_document_is_invalid() {
        let raw = json!([1, 2, 3]);
        assert!(matches!(
            LighthouseResult::from_value(&raw),
            Err(AnalysisFailure::InvalidStructure(_))
        ));
    }

    #[test]
    fn best_practices_reads_hyphenated_key() {
        let raw = json!({
            "categories": { "best-practices": { "score": 0.5 } },
            "audits": {}
        });
        let result = LighthouseResult::from_value(&raw).unwrap();
        let categories = result.categories.unwrap();
        assert_eq!(Categories::score_of(&categories.best_practices), Some(0.5));
    }
}
