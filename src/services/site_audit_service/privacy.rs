use crate::models::privacy::{
    CookieInfo, PageSnapshot, PrivacyReport, Tracker, TrackerCategory, TrackingId,
};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// (marker found in the page, tracker name, category)
pub const TRACKER_MARKERS: &[(&str, &str, TrackerCategory)] = &[
    ("google-analytics.com", "Google Analytics", TrackerCategory::Analytics),
    ("googletagmanager.com", "Google Tag Manager", TrackerCategory::Analytics),
    ("static.hotjar.com", "Hotjar", TrackerCategory::SessionReplay),
    ("clarity.ms", "Microsoft Clarity", TrackerCategory::SessionReplay),
    ("fullstory.com", "FullStory", TrackerCategory::SessionReplay),
    ("cdn.mxpnl.com", "Mixpanel", TrackerCategory::Analytics),
    ("cdn.segment.com", "Segment", TrackerCategory::Analytics),
    ("connect.facebook.net", "Facebook Pixel", TrackerCategory::Advertising),
    ("doubleclick.net", "DoubleClick", TrackerCategory::Advertising),
    ("googlesyndication.com", "Google AdSense", TrackerCategory::Advertising),
    ("snap.licdn.com", "LinkedIn Insight", TrackerCategory::Advertising),
    ("analytics.tiktok.com", "TikTok Pixel", TrackerCategory::Advertising),
    ("static.ads-twitter.com", "X (Twitter) Pixel", TrackerCategory::Advertising),
    ("platform.twitter.com", "X (Twitter) Widgets", TrackerCategory::Social),
    ("addthis.com", "AddThis", TrackerCategory::Social),
];

/// (marker, consent manager name)
pub const CONSENT_MARKERS: &[(&str, &str)] = &[
    ("cdn.cookielaw.org", "OneTrust"),
    ("onetrust", "OneTrust"),
    ("consent.cookiebot.com", "Cookiebot"),
    ("sdk.privacy-center.org", "Didomi"),
    ("cmp.osano.com", "Osano"),
    ("cdn-cookieyes.com", "CookieYes"),
    ("quantcast.mgr.consensu.org", "Quantcast Choice"),
];

const TRACKER_PENALTY: u32 = 10;
const INSECURE_COOKIE_PENALTY: u32 = 5;
const NO_CONSENT_PENALTY: u32 = 15;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern)
        .unwrap_or_else(|e| panic!("built-in pattern {} does not compile: {}", pattern, e))
}

static GA_UNIVERSAL: LazyLock<Regex> = LazyLock::new(|| compile(r"\bUA-\d{4,10}-\d{1,4}\b"));
static GA4: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"gtag\(\s*['"]config['"]\s*,\s*['"](G-[A-Z0-9]{4,12})['"]"#)
});
static GTM: LazyLock<Regex> = LazyLock::new(|| compile(r"\bGTM-[A-Z0-9]{4,8}\b"));
static FB_PIXEL: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"fbq\(\s*['"]init['"]\s*,\s*['"](\d{6,20})['"]"#));

pub fn normalize_privacy_tracking(url: &str, page: &PageSnapshot) -> PrivacyReport {
    let html = page.html.to_lowercase();

    let mut seen = HashSet::new();
    let trackers: Vec<Tracker> = TRACKER_MARKERS
        .iter()
        .filter(|(marker, _, _)| html.contains(marker))
        .filter(|(_, name, _)| seen.insert(*name))
        .map(|(marker, name, category)| Tracker {
            name: name.to_string(),
            category: *category,
            evidence: marker.to_string(),
        })
        .collect();

    let tracking_ids = extract_tracking_ids(&page.html);
    let cookies: Vec<CookieInfo> = page.set_cookies.iter().filter_map(|c| parse_cookie(c)).collect();
    let consent_manager = CONSENT_MARKERS
        .iter()
        .find(|(marker, _)| html.contains(marker))
        .map(|(_, name)| name.to_string());

    let insecure_cookies = cookies.iter().filter(|c| !c.secure || !c.http_only).count() as u32;
    let mut penalty = trackers.len() as u32 * TRACKER_PENALTY + insecure_cookies * INSECURE_COOKIE_PENALTY;
    if !trackers.is_empty() && consent_manager.is_none() {
        penalty += NO_CONSENT_PENALTY;
    }

    PrivacyReport {
        url: url.to_string(),
        final_url: page.final_url.clone(),
        trackers,
        tracking_ids,
        cookies,
        consent_manager,
        score: 100u32.saturating_sub(penalty) as u8,
    }
}

pub fn extract_tracking_ids(html: &str) -> Vec<TrackingId> {
    let mut ids = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |provider: &str, id: &str| {
        if seen.insert(id.to_string()) {
            ids.push(TrackingId {
                provider: provider.to_string(),
                id: id.to_string(),
            });
        }
    };

    for m in GA_UNIVERSAL.find_iter(html) {
        push("Google Analytics", m.as_str());
    }
    for cap in GA4.captures_iter(html) {
        if let Some(id) = cap.get(1) {
            push("Google Analytics 4", id.as_str());
        }
    }
    for m in GTM.find_iter(html) {
        push("Google Tag Manager", m.as_str());
    }
    for cap in FB_PIXEL.captures_iter(html) {
        if let Some(id) = cap.get(1) {
            push("Facebook Pixel", id.as_str());
        }
    }
    ids
}

/// Reads the name and attribute flags of one `Set-Cookie` value.
pub fn parse_cookie(header: &str) -> Option<CookieInfo> {
    let mut parts = header.split(';');
    let name = parts.next()?.split('=').next()?.trim();
    if name.is_empty() {
        return None;
    }

    let mut cookie = CookieInfo {
        name: name.to_string(),
        secure: false,
        http_only: false,
        same_site: None,
    };
    for attribute in parts {
        let (key, value) = match attribute.split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (attribute.trim(), None),
        };
        if key.eq_ignore_ascii_case("secure") {
            cookie.secure = true;
        } else if key.eq_ignore_ascii_case("httponly") {
            cookie.http_only = true;
        } else if key.eq_ignore_ascii_case("samesite") {
            cookie.same_site = value.map(str::to_string);
        }
    }
    Some(cookie)
}
