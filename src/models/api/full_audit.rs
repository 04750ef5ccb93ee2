use crate::error::{AnalysisFailure, ErrorBody};
use crate::models::lighthouse::NormalizedReport;
use crate::models::mobile::MobileFriendlyReport;
use crate::models::privacy::PrivacyReport;
use crate::models::security::SecurityHeadersReport;
use crate::models::tech::TechStackReport;
use serde::Serialize;

/// One category's slot in a combined audit: either its report or the failure body.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CategoryOutcome<T> {
    Ok(T),
    Failed(ErrorBody),
}

impl<T> From<Result<T, AnalysisFailure>> for CategoryOutcome<T> {
    fn from(result: Result<T, AnalysisFailure>) -> Self {
        match result {
            Ok(report) => CategoryOutcome::Ok(report),
            Err(failure) => CategoryOutcome::Failed(failure.body()),
        }
    }
}

impl<T> CategoryOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, CategoryOutcome::Ok(_))
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FullAudit {
    pub url: String,
    pub lighthouse: CategoryOutcome<NormalizedReport>,
    pub tech_stack: CategoryOutcome<TechStackReport>,
    pub security_headers: CategoryOutcome<SecurityHeadersReport>,
    pub mobile_friendly: CategoryOutcome<MobileFriendlyReport>,
    pub privacy_tracking: CategoryOutcome<PrivacyReport>,
}
