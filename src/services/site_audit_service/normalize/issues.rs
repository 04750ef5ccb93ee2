use super::to_score;
use crate::models::lighthouse::{Audit, AuditMap, Issue, IssuesByCategory};
use crate::utils::contains_word;

pub const MAX_ISSUES_PER_CATEGORY: usize = 10;

pub const ACCESSIBILITY_KEYWORDS: &[&str] = &[
    "aria",
    "color-contrast",
    "image-alt",
    "input-image-alt",
    "label",
    "button-name",
    "link-name",
    "document-title",
    "html-has-lang",
    "html-lang-valid",
    "heading-order",
    "tabindex",
    "duplicate-id",
    "list",
    "listitem",
    "definition-list",
    "dlitem",
    "bypass",
    "frame-title",
    "meta-viewport",
];

pub const BEST_PRACTICES_KEYWORDS: &[&str] = &[
    "is-on-https",
    "errors-in-console",
    "deprecations",
    "doctype",
    "charset",
    "inspector-issues",
    "geolocation-on-start",
    "notification-on-start",
    "image-aspect-ratio",
    "image-size-responsive",
    "no-vulnerable-libraries",
    "csp-xss",
    "valid-source-maps",
    "paste-preventing-inputs",
    "third-party-cookies",
];

pub const SEO_KEYWORDS: &[&str] = &[
    "meta-description",
    "http-status-code",
    "font-size",
    "link-text",
    "crawlable-anchors",
    "is-crawlable",
    "robots-txt",
    "hreflang",
    "canonical",
    "structured-data",
    "tap-targets",
    "plugins",
];

/// Failing audits grouped by the keyword set their id matches. One audit can
/// land in several categories.
pub fn extract_issues(audits: &AuditMap) -> IssuesByCategory {
    IssuesByCategory {
        accessibility: issues_for(audits, ACCESSIBILITY_KEYWORDS),
        best_practices: issues_for(audits, BEST_PRACTICES_KEYWORDS),
        seo: issues_for(audits, SEO_KEYWORDS),
    }
}

fn issues_for(audits: &AuditMap, keywords: &[&str]) -> Vec<Issue> {
    audits
        .iter()
        .filter(|(id, _)| keywords.iter().any(|k| contains_word(id, k)))
        .filter_map(|(id, audit)| match audit.score {
            Some(score) if score < 1.0 => Some(issue(id, audit, score)),
            _ => None,
        })
        .take(MAX_ISSUES_PER_CATEGORY)
        .collect()
}

fn issue(id: &str, audit: &Audit, score: f64) -> Issue {
    Issue {
        id: id.to_string(),
        title: audit.title.clone().unwrap_or_else(|| id.to_string()),
        description: audit.description.clone().unwrap_or_default(),
        score: to_score(score),
    }
}
