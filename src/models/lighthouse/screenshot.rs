use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse loading phase guessed from a frame's timestamp alone.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PhaseLabel {
    Initial,
    Early,
    Loading,
    Late,
    Complete,
}

impl PhaseLabel {
    pub fn from_timestamp(timestamp_ms: f64) -> Self {
        if timestamp_ms < 1000.0 {
            PhaseLabel::Initial
        } else if timestamp_ms < 3000.0 {
            PhaseLabel::Early
        } else if timestamp_ms < 8000.0 {
            PhaseLabel::Loading
        } else if timestamp_ms < 15000.0 {
            PhaseLabel::Late
        } else {
            PhaseLabel::Complete
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseLabel::Initial => "initial",
            PhaseLabel::Early => "early",
            PhaseLabel::Loading => "loading",
            PhaseLabel::Late => "late",
            PhaseLabel::Complete => "complete",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Screenshot {
    pub id: String,
    pub timestamp_ms: f64,
    pub image_data: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub phase_label: PhaseLabel,
    pub description: String,
}

/// One frame as a provider hands it over, before any validation.
#[derive(Debug, Clone, Default)]
pub struct RawFrame<'a> {
    pub data: Option<&'a Value>,
    pub timestamp: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl<'a> RawFrame<'a> {
    pub fn from_value(value: &'a Value) -> Self {
        let dimension = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
        };
        RawFrame {
            data: value.get("data"),
            // Lighthouse puts milliseconds in `timing`; its `timestamp` is a
            // trace clock in microseconds.
            timestamp: value
                .get("timing")
                .and_then(Value::as_f64)
                .or_else(|| value.get("timestamp").and_then(Value::as_f64)),
            width: dimension("width"),
            height: dimension("height"),
        }
    }
}
