use crate::models::security::{Grade, HeaderCheck, HeaderProbe, SecurityHeadersReport};

/// Headers every site should send, with what to do when one is missing.
pub const RECOMMENDED_HEADERS: &[(&str, &str)] = &[
    (
        "strict-transport-security",
        "Add Strict-Transport-Security: max-age=31536000; includeSubDomains",
    ),
    (
        "content-security-policy",
        "Define a Content-Security-Policy that restricts script and frame sources",
    ),
    ("x-content-type-options", "Add X-Content-Type-Options: nosniff"),
    (
        "x-frame-options",
        "Add X-Frame-Options: DENY or SAMEORIGIN, or a frame-ancestors CSP directive",
    ),
    (
        "referrer-policy",
        "Add Referrer-Policy: strict-origin-when-cross-origin",
    ),
    (
        "permissions-policy",
        "Add a Permissions-Policy limiting camera, microphone and geolocation",
    ),
];

/// Headers that leak server software details when present.
pub const EXPOSING_HEADERS: &[&str] = &["server", "x-powered-by", "x-aspnet-version"];

pub fn normalize_security_headers(url: &str, probe: &HeaderProbe) -> SecurityHeadersReport {
    let headers: Vec<HeaderCheck> = RECOMMENDED_HEADERS
        .iter()
        .map(|(name, advice)| {
            let value = probe.header(name).map(str::to_string);
            HeaderCheck {
                name: name.to_string(),
                present: value.is_some(),
                recommendation: match value {
                    Some(_) => None,
                    None => Some(advice.to_string()),
                },
                value,
            }
        })
        .collect();

    let exposed_headers = EXPOSING_HEADERS
        .iter()
        .filter_map(|name| {
            probe.header(name).map(|value| HeaderCheck {
                name: name.to_string(),
                present: true,
                value: Some(value.to_string()),
                recommendation: Some(format!("Remove or blank the {} header", name)),
            })
        })
        .collect();

    let present = headers.iter().filter(|h| h.present).count();
    let score = ((present as f64 / headers.len() as f64) * 100.0).round() as u8;

    SecurityHeadersReport {
        url: url.to_string(),
        final_url: probe.final_url.clone(),
        status_code: probe.status,
        https: probe.final_url.starts_with("https://"),
        headers,
        exposed_headers,
        score,
        grade: Grade::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(headers: &[(&str, &str)]) -> HeaderProbe {
        HeaderProbe {
            final_url: "https://example.com/".to_string(),
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn all_headers_present_scores_a() {
        let report = normalize_security_headers(
            "https://example.com",
            &probe(&[
                ("Strict-Transport-Security", "max-age=63072000"),
                ("Content-Security-Policy", "default-src 'self'"),
                ("X-Content-Type-Options", "nosniff"),
                ("X-Frame-Options", "DENY"),
                ("Referrer-Policy", "no-referrer"),
                ("Permissions-Policy", "camera=()"),
            ]),
        );
        assert_eq!(report.score, 100);
        assert_eq!(report.grade, Grade::A);
        assert!(report.https);
        assert!(report.headers.iter().all(|h| h.recommendation.is_none()));
    }

    #[test]
    fn missing_headers_carry_recommendations() {
        let report = normalize_security_headers(
            "https://example.com",
            &probe(&[
                ("x-content-type-options", "nosniff"),
                ("x-frame-options", "SAMEORIGIN"),
                ("referrer-policy", "origin"),
            ]),
        );
        assert_eq!(report.score, 50);
        assert_eq!(report.grade, Grade::C);
        let hsts = &report.headers[0];
        assert_eq!(hsts.name, "strict-transport-security");
        assert!(!hsts.present);
        assert!(hsts.recommendation.is_some());
    }

    #[test]
    fn exposing_headers_reported() {
        let report = normalize_security_headers(
            "http://example.com",
            &HeaderProbe {
                final_url: "http://example.com/".to_string(),
                status: 200,
                headers: vec![
                    ("Server".to_string(), "nginx/1.18.0".to_string()),
                    ("X-Powered-By".to_string(), "PHP/7.4".to_string()),
                ],
            },
        );
        assert!(!report.https);
        assert_eq!(report.score, 0);
        assert_eq!(report.grade, Grade::F);
        let names: Vec<&str> = report.exposed_headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["server", "x-powered-by"]);
        assert_eq!(report.exposed_headers[0].value.as_deref(), Some("nginx/1.18.0"));
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(75), Grade::B);
        assert_eq!(Grade::from_score(74), Grade::C);
        assert_eq!(Grade::from_score(25), Grade::D);
        assert_eq!(Grade::from_score(24), Grade::F);
    }
}
