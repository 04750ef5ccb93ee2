use serde::{Deserialize, Serialize};

/// A fetched page: final URL, body and every `Set-Cookie` value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSnapshot {
    pub final_url: String,
    pub html: String,
    pub set_cookies: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TrackerCategory {
    Analytics,
    Advertising,
    Social,
    SessionReplay,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tracker {
    pub name: String,
    pub category: TrackerCategory,
    pub evidence: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackingId {
    pub provider: String,
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CookieInfo {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyReport {
    pub url: String,
    pub final_url: String,
    pub trackers: Vec<Tracker>,
    pub tracking_ids: Vec<TrackingId>,
    pub cookies: Vec<CookieInfo>,
    pub consent_manager: Option<String>,
    pub score: u8,
}
