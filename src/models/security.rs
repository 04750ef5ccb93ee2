use serde::{Deserialize, Serialize};

/// What the HTTP probe saw, before any judgement is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderProbe {
    pub final_url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl HeaderProbe {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCheck {
    pub name: String,
    pub present: bool,
    pub value: Option<String>,
    pub recommendation: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::A,
            75..=89 => Grade::B,
            50..=74 => Grade::C,
            25..=49 => Grade::D,
            _ => Grade::F,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityHeadersReport {
    pub url: String,
    pub final_url: String,
    pub status_code: u16,
    pub https: bool,
    pub headers: Vec<HeaderCheck>,
    pub exposed_headers: Vec<HeaderCheck>,
    pub score: u8,
    pub grade: Grade,
}
