use crate::models::lighthouse::NormalizedReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    Mobile,
    Desktop,
    Tablet,
}

/// One real-user metric from the PageSpeed `loadingExperience` block.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetric {
    pub percentile: Option<f64>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldData {
    pub form_factor: FormFactor,
    pub overall_category: Option<String>,
    pub metrics: BTreeMap<String, FieldMetric>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MobileChecks {
    pub viewport: Option<bool>,
    pub font_size: Option<bool>,
    pub tap_targets: Option<bool>,
}

impl MobileChecks {
    /// Every check we could run passed, and at least one ran.
    pub fn passed(&self) -> bool {
        let ran: Vec<bool> = [self.viewport, self.font_size, self.tap_targets]
            .into_iter()
            .flatten()
            .collect();
        !ran.is_empty() && ran.iter().all(|ok| *ok)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MobileFriendlyReport {
    pub mobile_friendly: bool,
    pub checks: MobileChecks,
    pub field_data: Option<FieldData>,
    pub report: NormalizedReport,
}
