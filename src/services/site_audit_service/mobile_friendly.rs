use crate::error::AnalysisFailure;
use crate::models::lighthouse::AuditMap;
use crate::models::mobile::{FieldData, FieldMetric, FormFactor, MobileChecks, MobileFriendlyReport};
use crate::services::site_audit_service::normalize::{normalize_performance_report_with, ReportProfile};
use serde_json::Value;
use std::collections::BTreeMap;

const MOBILE_CHECK_PASS: f64 = 0.9;

/// PageSpeed Insights response -> mobile report. The embedded Lighthouse
/// result goes through the restricted profile.
pub fn normalize_mobile_friendly(raw: &Value, url: &str) -> Result<MobileFriendlyReport, AnalysisFailure> {
    let lighthouse = raw.get("lighthouseResult").ok_or_else(|| {
        AnalysisFailure::InvalidStructure("missing lighthouseResult".to_string())
    })?;

    let report = normalize_performance_report_with(lighthouse, url, ReportProfile::Restricted)?;

    let checks = lighthouse
        .get("audits")
        .and_then(Value::as_object)
        .map(|audits| mobile_checks(&AuditMap::from_object(audits)))
        .unwrap_or_default();

    Ok(MobileFriendlyReport {
        mobile_friendly: checks.passed(),
        checks,
        field_data: field_data(raw.get("loadingExperience"), FormFactor::Mobile),
        report,
    })
}

fn mobile_checks(audits: &AuditMap) -> MobileChecks {
    let passed = |key: &str| {
        audits
            .get(key)
            .and_then(|a| a.score)
            .map(|score| score >= MOBILE_CHECK_PASS)
    };
    MobileChecks {
        viewport: passed("viewport"),
        font_size: passed("font-size"),
        tap_targets: passed("tap-targets"),
    }
}

/// Real-user metrics from `loadingExperience`; `None` when CrUX had no data.
fn field_data(experience: Option<&Value>, form_factor: FormFactor) -> Option<FieldData> {
    let metrics_object = experience?.get("metrics")?.as_object()?;
    let metrics: BTreeMap<String, FieldMetric> = metrics_object
        .iter()
        .map(|(name, metric)| {
            (
                name.clone(),
                FieldMetric {
                    percentile: metric.get("percentile").and_then(Value::as_f64),
                    category: metric
                        .get("category")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                },
            )
        })
        .collect();
    if metrics.is_empty() {
        return None;
    }
    Some(FieldData {
        form_factor,
        overall_category: experience
            .and_then(|e| e.get("overall_category"))
            .and_then(Value::as_str)
            .map(str::to_string),
        metrics,
    })
}
