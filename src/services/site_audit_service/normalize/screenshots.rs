use crate::models::lighthouse::{AuditMap, PhaseLabel, RawFrame, Screenshot};
use log::debug;
use serde_json::Value;
use std::collections::HashSet;

pub const DEDUP_BUCKET_MS: f64 = 100.0;

pub const POST_LCP: &str = "post-LCP";
pub const POST_SPEED_INDEX: &str = "post-Speed-Index";
pub const POST_FCP: &str = "post-FCP";
pub const INITIAL_LOAD_STATE: &str = "initial load state";

/// Paint timings used to place a lone screenshot in time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaintTimings {
    pub first_contentful_paint: Option<f64>,
    pub speed_index: Option<f64>,
    pub largest_contentful_paint: Option<f64>,
}

impl PaintTimings {
    pub fn from_audits(audits: &AuditMap) -> Self {
        let numeric = |key: &str| audits.get(key).and_then(|a| a.numeric_value);
        PaintTimings {
            first_contentful_paint: numeric("first-contentful-paint"),
            speed_index: numeric("speed-index"),
            largest_contentful_paint: numeric("largest-contentful-paint"),
        }
    }
}

/// Collects frames from `screenshots`, `filmstrip` and the final-screenshot
/// audit, then sorts and deduplicates them.
pub fn extract_screenshots(
    screenshots: Option<&[Value]>,
    filmstrip: Option<&[Value]>,
    audits: Option<&AuditMap>,
) -> Vec<Screenshot> {
    let mut frames = Vec::new();

    if let Some(source) = screenshots {
        frames.extend(collect_source("screenshot", source));
    }
    if let Some(source) = filmstrip {
        frames.extend(collect_source("filmstrip", source));
    }
    if let Some(details) = audits
        .and_then(|a| a.get("final-screenshot"))
        .and_then(|a| a.details.as_ref())
    {
        if let Some(shot) = accept_frame("final-screenshot".to_string(), 0, &RawFrame::from_value(details)) {
            frames.push(shot);
        }
    }

    frames.sort_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms));
    let mut frames = dedup_screenshots(frames);

    if let [only] = frames.as_mut_slice() {
        let timings = audits.map(PaintTimings::from_audits).unwrap_or_default();
        only.description = single_frame_label(only.timestamp_ms, &timings).to_string();
    }

    frames
}

fn collect_source(prefix: &str, source: &[Value]) -> Vec<Screenshot> {
    source
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            accept_frame(
                format!("{}-{}", prefix, index),
                index,
                &RawFrame::from_value(value),
            )
        })
        .collect()
}

fn accept_frame(id: String, index: usize, frame: &RawFrame) -> Option<Screenshot> {
    let image_data = match frame.data {
        Some(Value::String(data)) if !strip_data_uri(data).trim().is_empty() => data.clone(),
        _ => {
            debug!("Rejecting frame {}: missing or empty image payload", id);
            return None;
        }
    };

    let timestamp_ms = frame.timestamp.unwrap_or(index as f64 * 1000.0);
    let phase_label = PhaseLabel::from_timestamp(timestamp_ms);

    Some(Screenshot {
        description: format!("{} frame at {:.0}ms", phase_label.as_str(), timestamp_ms),
        id,
        timestamp_ms,
        image_data,
        width: frame.width,
        height: frame.height,
        phase_label,
    })
}

/// Drops a leading `data:image/...;base64,` header, leaving the payload.
pub fn strip_data_uri(data: &str) -> &str {
    if data.starts_with("data:image/") {
        if let Some(idx) = data.find(";base64,") {
            return &data[idx + ";base64,".len()..];
        }
    }
    data
}

/// Keeps the first frame in each 100ms bucket. Input order is preserved, so
/// a sorted input stays sorted and a second pass changes nothing.
pub fn dedup_screenshots(frames: Vec<Screenshot>) -> Vec<Screenshot> {
    let mut seen = HashSet::new();
    frames
        .into_iter()
        .filter(|frame| seen.insert(bucket_of(frame.timestamp_ms)))
        .collect()
}

pub fn bucket_of(timestamp_ms: f64) -> i64 {
    (timestamp_ms / DEDUP_BUCKET_MS).floor() as i64
}

/// LCP is checked first, then Speed Index, then FCP.
pub fn single_frame_label(timestamp_ms: f64, timings: &PaintTimings) -> &'static str {
    let reached = |metric: Option<f64>| metric.is_some_and(|m| timestamp_ms >= m);

    if reached(timings.largest_contentful_paint) {
        POST_LCP
    } else if reached(timings.speed_index) {
        POST_SPEED_INDEX
    } else if reached(timings.first_contentful_paint) {
        POST_FCP
    } else {
        INITIAL_LOAD_STATE
    }
}
