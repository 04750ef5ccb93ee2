use super::to_score;
use crate::models::lighthouse::{Audit, AuditMap, Suggestion, SuggestionKind};

pub const OPPORTUNITY_AUDITS: &[&str] = &[
    "render-blocking-resources",
    "unused-css-rules",
    "unused-javascript",
    "modern-image-formats",
    "offscreen-images",
    "unminified-css",
    "unminified-javascript",
    "uses-optimized-images",
    "uses-text-compression",
    "uses-responsive-images",
    "efficient-animated-content",
    "duplicated-javascript",
    "legacy-javascript",
    "server-response-time",
    "redirects",
    "uses-rel-preconnect",
    "prioritize-lcp-image",
];

pub const DIAGNOSTIC_AUDITS: &[&str] = &[
    "dom-size",
    "bootup-time",
    "mainthread-work-breakdown",
    "font-display",
    "third-party-summary",
    "uses-long-cache-ttl",
    "total-byte-weight",
    "critical-request-chains",
    "long-tasks",
    "layout-shift-elements",
    "largest-contentful-paint-element",
    "uses-passive-event-listeners",
    "no-document-write",
];

const OPPORTUNITY_THRESHOLD: f64 = 1.0;
const DIAGNOSTIC_THRESHOLD: f64 = 0.9;

/// Failing opportunities in allow-list order, then failing diagnostics, capped at `limit`.
pub fn extract_suggestions(audits: &AuditMap, limit: usize) -> Vec<Suggestion> {
    let opportunities = OPPORTUNITY_AUDITS
        .iter()
        .filter_map(|id| failing(audits, id, OPPORTUNITY_THRESHOLD, SuggestionKind::Opportunity));
    let diagnostics = DIAGNOSTIC_AUDITS
        .iter()
        .filter_map(|id| failing(audits, id, DIAGNOSTIC_THRESHOLD, SuggestionKind::Diagnostic));

    opportunities.chain(diagnostics).take(limit).collect()
}

fn failing(audits: &AuditMap, id: &str, threshold: f64, kind: SuggestionKind) -> Option<Suggestion> {
    let audit = audits.get(id)?;
    let score = audit.score?;
    if score >= threshold {
        return None;
    }
    Some(suggestion(id, audit, score, kind))
}

fn suggestion(id: &str, audit: &Audit, score: f64, kind: SuggestionKind) -> Suggestion {
    Suggestion {
        id: id.to_string(),
        kind,
        title: audit.title.clone().unwrap_or_else(|| id.to_string()),
        description: audit.description.clone().unwrap_or_default(),
        score: to_score(score),
        savings: audit.display_value.clone().filter(|v| !v.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn audits(value: Value) -> AuditMap {
        AuditMap::from_object(value.as_object().unwrap())
    }

    #[test]
    fn opportunity_below_one_kept_diagnostic_above_point_nine_dropped() {
        let audits = audits(json!({
            "unused-css-rules": { "title": "Reduce unused CSS", "score": 0.5, "displayValue": "Potential savings of 40 KiB" },
            "dom-size": { "title": "Avoid an excessive DOM size", "score": 0.95 }
        }));
        let suggestions = extract_suggestions(&audits, 10);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].id, "unused-css-rules");
        assert_eq!(suggestions[0].score, 50);
        assert_eq!(suggestions[0].kind, SuggestionKind::Opportunity);
        assert_eq!(
            suggestions[0].savings.as_deref(),
            Some("Potential savings of 40 KiB")
        );
    }

    #[test]
    fn null_and_passing_scores_are_ignored() {
        let audits = audits(json!({
            "render-blocking-resources": { "score": null },
            "unused-javascript": { "score": 1 },
            "bootup-time": { "score": 0.9 },
            "dom-size": { "score": 0.89 }
        }));
        let ids: Vec<String> = extract_suggestions(&audits, 10)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["dom-size"]);
    }

    #[test]
    fn order_follows_allow_lists_not_severity() {
        let audits = audits(json!({
            "dom-size": { "score": 0.0 },
            "offscreen-images": { "score": 0.8 },
            "render-blocking-resources": { "score": 0.3 }
        }));
        let ids: Vec<String> = extract_suggestions(&audits, 10)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(
            ids,
            vec!["render-blocking-resources", "offscreen-images", "dom-size"]
        );
    }

    #[test]
    fn capped_at_limit() {
        let mut object = serde_json::Map::new();
        for id in OPPORTUNITY_AUDITS.iter().chain(DIAGNOSTIC_AUDITS) {
            object.insert(id.to_string(), json!({ "score": 0 }));
        }
        let audits = AuditMap::from_object(&object);
        assert_eq!(extract_suggestions(&audits, 10).len(), 10);
        assert_eq!(extract_suggestions(&audits, 5).len(), 5);
    }
}
