use crate::error::AnalysisFailure;
use crate::models::privacy::PageSnapshot;
use crate::models::security::HeaderProbe;
use crate::models::AppState;
use crate::services::site_audit_service::pagespeed::request_failure;
use log::{debug, info};
use reqwest::header::SET_COOKIE;
use reqwest::{Response, StatusCode};

pub const PROBE: &str = "http-probe";

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// HEAD request against `url`, retried as GET when the server refuses HEAD.
pub async fn probe_headers(state: &AppState, url: &str) -> Result<HeaderProbe, AnalysisFailure> {
    info!("Probing response headers for {}", url);
    let secs = state.config.probe_timeout.as_secs();
    let mut response = state
        .http_client
        .head(url)
        .send()
        .await
        .map_err(|e| request_failure(PROBE, secs, e))?;

    if matches!(
        response.status(),
        StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
    ) {
        debug!("{} refused HEAD, retrying with GET", url);
        response = state
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| request_failure(PROBE, secs, e))?;
    }

    Ok(HeaderProbe {
        final_url: response.url().to_string(),
        status: response.status().as_u16(),
        headers: response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
    })
}

/// GET `url` and keep the HTML along with every cookie the server set.
pub async fn fetch_page(state: &AppState, url: &str) -> Result<PageSnapshot, AnalysisFailure> {
    info!("Fetching page content for {}", url);
    let secs = state.config.probe_timeout.as_secs();
    let response = state
        .http_client
        .get(url)
        .send()
        .await
        .map_err(|e| request_failure(PROBE, secs, e))?;

    let final_url = response.url().to_string();
    let set_cookies = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    let body = read_capped(response, MAX_BODY_BYTES)
        .await
        .map_err(|e| request_failure(PROBE, secs, e))?;

    Ok(PageSnapshot {
        final_url,
        html: String::from_utf8_lossy(&body).into_owned(),
        set_cookies,
    })
}

async fn read_capped(mut response: Response, limit: usize) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            debug!("Body truncated at {} bytes", limit);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;

    #[tokio::test]
    async fn unreachable_host_is_connection_refused() {
        // nothing listens on port 1 locally
        let state = AppState::new(Config {
            probe_timeout: Duration::from_secs(5),
            ..Config::default()
        })
        .unwrap();
        let err = probe_headers(&state, "http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(err, AnalysisFailure::ConnectionRefused(_)));
    }
}
