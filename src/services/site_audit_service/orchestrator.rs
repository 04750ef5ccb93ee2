use crate::error::AnalysisFailure;
use crate::models::lighthouse::NormalizedReport;
use crate::models::mobile::MobileFriendlyReport;
use crate::models::privacy::PrivacyReport;
use crate::models::security::SecurityHeadersReport;
use crate::models::tech::TechStackReport;
use crate::models::{AppState, CategoryOutcome, FullAudit};
use crate::services::site_audit_service::lighthouse::run_lighthouse;
use crate::services::site_audit_service::mobile_friendly::normalize_mobile_friendly;
use crate::services::site_audit_service::normalize::normalize_performance_report;
use crate::services::site_audit_service::pagespeed::run_pagespeed;
use crate::services::site_audit_service::privacy::normalize_privacy_tracking;
use crate::services::site_audit_service::probe::{fetch_page, probe_headers};
use crate::services::site_audit_service::security_headers::normalize_security_headers;
use crate::services::site_audit_service::tech_stack::normalize_tech_stack_report;
use crate::services::site_audit_service::wappalyzer::{
    detect_technologies, TechnologyProvider, WappalyzerCli,
};
use crate::utils::normalize_url;
use log::{error, info};

pub async fn analyze_lighthouse(
    state: &AppState,
    url: &str,
) -> Result<NormalizedReport, AnalysisFailure> {
    let url = normalize_url(url)?;
    let raw = run_lighthouse(&state.config, &url).await.inspect_err(|e| {
        error!("Lighthouse run failed for {}: {}", url, e);
    })?;
    let report = normalize_off_thread(&url, move |url| normalize_performance_report(&raw, url)).await?;
    info!("Lighthouse analysis complete for {}", url);
    Ok(report)
}

pub async fn analyze_tech_stack(
    state: &AppState,
    url: &str,
) -> Result<TechStackReport, AnalysisFailure> {
    let mut provider = WappalyzerCli::new(&state.config);
    analyze_tech_stack_with(&mut provider, url).await
}

pub async fn analyze_tech_stack_with<P: TechnologyProvider>(
    provider: &mut P,
    url: &str,
) -> Result<TechStackReport, AnalysisFailure> {
    let url = normalize_url(url)?;
    let technologies = detect_technologies(provider, &url).await.inspect_err(|e| {
        error!("Technology detection failed for {}: {}", url, e);
    })?;
    let report = normalize_tech_stack_report(&url, technologies);
    info!(
        "Tech stack analysis complete for {}: {} technologies",
        url,
        report.technologies.len()
    );
    Ok(report)
}

pub async fn analyze_security_headers(
    state: &AppState,
    url: &str,
) -> Result<SecurityHeadersReport, AnalysisFailure> {
    let url = normalize_url(url)?;
    let probe = probe_headers(state, &url).await.inspect_err(|e| {
        error!("Header probe failed for {}: {}", url, e);
    })?;
    let report = normalize_security_headers(&url, &probe);
    info!("Security headers for {} graded {:?}", url, report.grade);
    Ok(report)
}

pub async fn analyze_mobile_friendly(
    state: &AppState,
    url: &str,
) -> Result<MobileFriendlyReport, AnalysisFailure> {
    let url = normalize_url(url)?;
    let raw = run_pagespeed(state, &url).await.inspect_err(|e| {
        error!("PageSpeed request failed for {}: {}", url, e);
    })?;
    let report = normalize_off_thread(&url, move |url| normalize_mobile_friendly(&raw, url)).await?;
    info!("Mobile-friendly analysis complete for {}", url);
    Ok(report)
}

pub async fn analyze_privacy_tracking(
    state: &AppState,
    url: &str,
) -> Result<PrivacyReport, AnalysisFailure> {
    let url = normalize_url(url)?;
    let page = fetch_page(state, &url).await.inspect_err(|e| {
        error!("Page fetch failed for {}: {}", url, e);
    })?;
    let report = normalize_off_thread(&url, move |url| Ok(normalize_privacy_tracking(url, &page))).await?;
    info!(
        "Privacy analysis complete for {}: {} trackers",
        url,
        report.trackers.len()
    );
    Ok(report)
}

/// Runs every category concurrently. A failing category is reported in place
/// and never blocks the others.
pub async fn analyze_all(state: &AppState, url: &str) -> Result<FullAudit, AnalysisFailure> {
    let url = normalize_url(url)?;
    info!("Running full audit for {}", url);

    let (lighthouse, tech_stack, security_headers, mobile_friendly, privacy_tracking) = futures::join!(
        analyze_lighthouse(state, &url),
        analyze_tech_stack(state, &url),
        analyze_security_headers(state, &url),
        analyze_mobile_friendly(state, &url),
        analyze_privacy_tracking(state, &url),
    );

    let audit = FullAudit {
        url,
        lighthouse: CategoryOutcome::from(lighthouse),
        tech_stack: CategoryOutcome::from(tech_stack),
        security_headers: CategoryOutcome::from(security_headers),
        mobile_friendly: CategoryOutcome::from(mobile_friendly),
        privacy_tracking: CategoryOutcome::from(privacy_tracking),
    };
    let succeeded = [
        audit.lighthouse.is_ok(),
        audit.tech_stack.is_ok(),
        audit.security_headers.is_ok(),
        audit.mobile_friendly.is_ok(),
        audit.privacy_tracking.is_ok(),
    ]
    .iter()
    .filter(|ok| **ok)
    .count();
    info!("Full audit for {} finished, {}/5 categories succeeded", audit.url, succeeded);
    Ok(audit)
}

/// Runs a normalizer on the blocking pool. A panic inside it becomes an
/// `Internal` failure for `url` instead of taking the request down.
async fn normalize_off_thread<T, F>(url: &str, normalize: F) -> Result<T, AnalysisFailure>
where
    T: Send + 'static,
    F: FnOnce(&str) -> Result<T, AnalysisFailure> + Send + 'static,
{
    let owned = url.to_string();
    match tokio::task::spawn_blocking(move || normalize(&owned)).await {
        Ok(result) => result,
        Err(e) => {
            error!("Normalizer for {} did not complete: {}", url, e);
            Err(AnalysisFailure::internal(url, e.to_string()))
        }
    }
}
