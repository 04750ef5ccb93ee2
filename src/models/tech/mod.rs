use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A technology as detected by the provider, flattened to a single category string.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectedTechnology {
    pub name: String,
    pub version: Option<String>,
    pub confidence: Option<u8>,
    pub category: String,
}

/// Buckets, declared in classification order.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TechCategory {
    Frontend,
    Backend,
    Database,
    Language,
    Framework,
    Library,
    Cms,
    Ecommerce,
    Analytics,
    WebServer,
    Cdn,
    Hosting,
    Cloud,
    Security,
    Payment,
    Advertising,
    AbTesting,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechStackReport {
    pub url: String,
    pub technologies: Vec<DetectedTechnology>,
    pub categories: BTreeMap<TechCategory, Vec<DetectedTechnology>>,
}

impl TechStackReport {
    pub fn bucket(&self, category: TechCategory) -> &[DetectedTechnology] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
