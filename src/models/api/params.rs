use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ParamsAnalyze {
    pub url: String,
}

/// A successful report stamped with the time the analysis finished.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Analyzed<T> {
    #[serde(flatten)]
    pub report: T,
    pub analyzed_at: String,
}
