use crate::error::AnalysisFailure;
use url::Url;

/// Trims the input, prepends `https://` when no scheme is given and checks
/// that the result is an http(s) URL with a host.
pub fn normalize_url(input: &str) -> Result<String, AnalysisFailure> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalysisFailure::InvalidRequest("url is required".to_string()));
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| AnalysisFailure::InvalidRequest(format!("invalid url {}: {}", trimmed, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AnalysisFailure::InvalidRequest(format!(
                "unsupported scheme {}",
                other
            )))
        }
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AnalysisFailure::InvalidRequest(format!(
            "url {} has no host",
            trimmed
        )));
    }

    Ok(candidate)
}

fn has_scheme(input: &str) -> bool {
    match input.find("://") {
        Some(idx) => {
            let scheme = &input[..idx];
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        None => false,
    }
}
