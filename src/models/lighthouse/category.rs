use serde::{Deserialize, Serialize};

// pub struct for each category score as the provider reports it
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Category {
    pub score: Option<f64>,
    pub title: Option<String>,
}

// pub struct for Lighthouse categories
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Categories {
    pub performance: Option<Category>,
    pub accessibility: Option<Category>,
    #[serde(rename = "best-practices")]
    pub best_practices: Option<Category>,
    pub seo: Option<Category>,
    pub pwa: Option<Category>,
}

impl Categories {
    pub fn score_of(category: &Option<Category>) -> Option<f64> {
        category.as_ref().and_then(|c| c.score)
    }
}

/// Normalized 0-100 scores. A category the provider did not score stays `None`
/// and is left out of the serialized object.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct CategoryScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<u8>,
    #[serde(rename = "best-practices", skip_serializing_if = "Option::is_none")]
    pub best_practices: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pwa: Option<u8>,
}

impl CategoryScores {
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    /// Scored categories, keyed the way Lighthouse names them.
    pub fn present(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        [
            ("performance", self.performance),
            ("accessibility", self.accessibility),
            ("best-practices", self.best_practices),
            ("seo", self.seo),
            ("pwa", self.pwa),
        ]
        .into_iter()
        .filter_map(|(name, score)| score.map(|s| (name, s)))
    }
}
