use crate::models::tech::{DetectedTechnology, TechCategory, TechStackReport};
use crate::utils::contains_word;
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

type Predicate = fn(name: &str, category: &str) -> bool;

/// Classification rules, evaluated top to bottom. The first predicate that
/// matches decides the bucket, so reordering this table changes results for
/// technologies that satisfy more than one rule.
pub const CLASSIFIERS: &[(TechCategory, Predicate)] = &[
    (TechCategory::Frontend, is_frontend),
    (TechCategory::Backend, is_backend),
    (TechCategory::Database, is_database),
    (TechCategory::Language, is_language),
    (TechCategory::Framework, is_framework),
    (TechCategory::Library, is_library),
    (TechCategory::Cms, is_cms),
    (TechCategory::Ecommerce, is_ecommerce),
    (TechCategory::Analytics, is_analytics),
    (TechCategory::WebServer, is_web_server),
    (TechCategory::Cdn, is_cdn),
    (TechCategory::Hosting, is_hosting),
    (TechCategory::Cloud, is_cloud),
    (TechCategory::Security, is_security),
    (TechCategory::Payment, is_payment),
    (TechCategory::Advertising, is_advertising),
    (TechCategory::AbTesting, is_ab_testing),
];

// Keywords match whole words, optionally pluralized: "web server" matches
// "Web servers" but "express" does not match "ExpressionEngine".
fn mentions(name: &str, category: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| {
        let plural = format!("{}s", k);
        [name, category]
            .iter()
            .any(|text| contains_word(text, k) || contains_word(text, &plural))
    })
}

fn is_frontend(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &[
            "react", "vue", "angular", "angularjs", "svelte", "sveltekit", "next.js", "nuxt",
            "gatsby", "ember", "preact", "alpine.js", "ui framework", "javascript framework",
        ],
    )
}

fn is_backend(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &[
            "express", "django", "rails", "laravel", "spring", "asp.net", "flask", "symfony",
            "phoenix", "node.js", "web framework",
        ],
    )
}

fn is_database(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &[
            "mysql", "postgres", "postgresql", "mongodb", "redis", "sqlite", "mariadb", "elasticsearch",
            "firebase", "database",
        ],
    )
}

// Names are matched exactly here: "go" or "java" as substrings would
// swallow "google" and "javascript".
fn is_language(name: &str, category: &str) -> bool {
    const LANGUAGES: &[&str] = &[
        "php", "python", "ruby", "java", "go", "typescript", "perl", "scala", "elixir", "erlang",
    ];
    LANGUAGES.contains(&name) || category.contains("programming language")
}

fn is_framework(name: &str, category: &str) -> bool {
    mentions(name, category, &["framework"])
}

fn is_library(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &["library", "libraries", "jquery", "lodash", "moment.js", "d3", "gsap", "underscore.js"],
    )
}

fn is_cms(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &[
            "cms", "wordpress", "drupal", "joomla", "ghost", "contentful", "strapi", "wix",
            "squarespace", "webflow", "expressionengine",
        ],
    )
}

fn is_ecommerce(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &[
            "ecommerce", "e-commerce", "shopify", "woocommerce", "magento", "bigcommerce",
            "prestashop",
        ],
    )
}

fn is_analytics(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &[
            "analytics", "tag manager", "hotjar", "mixpanel", "segment", "matomo", "plausible",
            "amplitude",
        ],
    )
}

fn is_web_server(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &["web server", "nginx", "apache", "iis", "litespeed", "caddy", "openresty"],
    )
}

fn is_cdn(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &["cdn", "cloudflare", "fastly", "akamai", "cloudfront", "jsdelivr", "unpkg"],
    )
}

fn is_hosting(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &["hosting", "paas", "vercel", "netlify", "heroku", "github pages", "wp engine"],
    )
}

fn is_cloud(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &["iaas", "cloud", "amazon web services", "aws", "azure", "google cloud"],
    )
}

fn is_security(name: &str, category: &str) -> bool {
    mentions(name, category, &["security", "recaptcha", "captcha", "hsts", "waf"])
}

fn is_payment(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &["payment", "stripe", "paypal", "braintree", "klarna", "square"],
    )
}

fn is_advertising(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &["advertising", "adsense", "doubleclick", "taboola", "outbrain", "criteo"],
    )
}

fn is_ab_testing(name: &str, category: &str) -> bool {
    mentions(
        name,
        category,
        &["a/b testing", "optimizely", "vwo", "google optimize", "ab tasty"],
    )
}

/// First matching bucket, or `None` when no rule matches.
pub fn classify(technology: &DetectedTechnology) -> Option<TechCategory> {
    let name = technology.name.to_lowercase();
    let category = technology.category.to_lowercase();
    CLASSIFIERS
        .iter()
        .find(|(_, matches)| matches(&name, &category))
        .map(|(bucket, _)| *bucket)
}

/// Places each technology in exactly one bucket. Unmatched technologies stay
/// in the flat `technologies` list but appear in no bucket.
pub fn normalize_tech_stack_report(url: &str, technologies: Vec<DetectedTechnology>) -> TechStackReport {
    let mut categories: BTreeMap<TechCategory, Vec<DetectedTechnology>> = BTreeMap::new();
    for technology in &technologies {
        match classify(technology) {
            Some(bucket) => categories.entry(bucket).or_default().push(technology.clone()),
            None => debug!(
                "No bucket for {} ({}), leaving it unclassified",
                technology.name, technology.category
            ),
        }
    }
    TechStackReport {
        url: url.to_string(),
        technologies,
        categories,
    }
}

/// Reads Wappalyzer output (`{ "technologies": [...] }` or a bare array),
/// joining each technology's category names into one string.
pub fn parse_wappalyzer_output(raw: &Value) -> Vec<DetectedTechnology> {
    let entries = raw
        .get("technologies")
        .and_then(Value::as_array)
        .or_else(|| raw.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get("name").and_then(Value::as_str)?.trim();
            if name.is_empty() {
                return None;
            }
            let category = match entry.get("categories").and_then(Value::as_array) {
                Some(list) => list
                    .iter()
                    .filter_map(|c| c.get("name").and_then(Value::as_str).or_else(|| c.as_str()))
                    .collect::<Vec<_>>()
                    .join(", "),
                None => entry
                    .get("category")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            };
            Some(DetectedTechnology {
                name: name.to_string(),
                version: entry
                    .get("version")
                    .and_then(Value::as_str)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
                confidence: entry
                    .get("confidence")
                    .and_then(Value::as_u64)
                    .map(|c| c.min(100) as u8),
                category,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tech(name: &str, category: &str) -> DetectedTechnology {
        DetectedTechnology {
            name: name.to_string(),
            version: None,
            confidence: Some(100),
            category: category.to_string(),
        }
    }

    #[test]
    fn react_is_frontend_before_framework() {
        assert_eq!(
            classify(&tech("React", "JavaScript framework")),
            Some(TechCategory::Frontend)
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        // "Web frameworks" hits backend, which is evaluated before framework
        assert_eq!(
            classify(&tech("Django", "Web frameworks")),
            Some(TechCategory::Backend)
        );
        assert_eq!(
            classify(&tech("Bulma", "UI frameworks")),
            Some(TechCategory::Frontend)
        );
        assert_eq!(
            classify(&tech("Hugo", "Static site generator framework")),
            Some(TechCategory::Framework)
        );
        // Cloudflare matches cdn before cloud
        assert_eq!(classify(&tech("Cloudflare", "CDN")), Some(TechCategory::Cdn));
    }

    #[test]
    fn keywords_do_not_match_inside_other_names() {
        assert_eq!(
            classify(&tech("ExpressionEngine", "CMS")),
            Some(TechCategory::Cms)
        );
        assert_eq!(classify(&tech("Express", "Web frameworks")), Some(TechCategory::Backend));
        assert_eq!(classify(&tech("Remember", "Miscellaneous")), None);
        assert_eq!(
            classify(&tech("D3", "JavaScript graphics")),
            Some(TechCategory::Library)
        );
        assert_eq!(
            classify(&tech("PostgreSQL", "Databases")),
            Some(TechCategory::Database)
        );
    }

    #[test]
    fn languages_match_exact_names() {
        assert_eq!(classify(&tech("PHP", "")), Some(TechCategory::Language));
        assert_eq!(
            classify(&tech("Google Analytics", "Analytics")),
            Some(TechCategory::Analytics)
        );
        assert_eq!(
            classify(&tech("Go", "Programming languages")),
            Some(TechCategory::Language)
        );
    }

    #[test]
    fn classification_order_is_declaration_order() {
        let buckets: Vec<TechCategory> = CLASSIFIERS.iter().map(|(b, _)| *b).collect();
        let mut sorted = buckets.clone();
        sorted.sort();
        assert_eq!(buckets, sorted);
        assert_eq!(buckets.len(), 17);
    }

    #[test]
    fn unmatched_technology_is_dropped_from_buckets() {
        let report = normalize_tech_stack_report(
            "https://example.com",
            vec![tech("React", "JavaScript frameworks"), tech("Mystery", "Miscellaneous")],
        );
        assert_eq!(report.technologies.len(), 2);
        assert_eq!(report.bucket(TechCategory::Frontend).len(), 1);
        let bucketed: usize = report.categories.values().map(Vec::len).sum();
        assert_eq!(bucketed, 1);
    }

    #[test]
    fn each_technology_lands_in_one_bucket() {
        let report = normalize_tech_stack_report(
            "https://example.com",
            vec![
                tech("Shopify", "Ecommerce"),
                tech("Stripe", "Payment processors"),
                tech("Nginx", "Web servers"),
                tech("jQuery", "JavaScript libraries"),
            ],
        );
        assert_eq!(report.bucket(TechCategory::Ecommerce)[0].name, "Shopify");
        assert_eq!(report.bucket(TechCategory::Payment)[0].name, "Stripe");
        assert_eq!(report.bucket(TechCategory::WebServer)[0].name, "Nginx");
        assert_eq!(report.bucket(TechCategory::Library)[0].name, "jQuery");
        let bucketed: usize = report.categories.values().map(Vec::len).sum();
        assert_eq!(bucketed, 4);
    }

    #[test]
    fn buckets_serialize_with_kebab_keys() {
        let report = normalize_tech_stack_report("https://example.com", vec![tech("Nginx", "Web servers")]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["categories"]["web-server"][0]["name"], "Nginx");
    }

    #[test]
    fn parses_wappalyzer_json() {
        let raw = json!({
            "urls": { "https://example.com/": { "status": 200 } },
            "technologies": [
                {
                    "slug": "react", "name": "React", "confidence": 100, "version": "18.2.0",
                    "categories": [ { "id": 12, "slug": "javascript-frameworks", "name": "JavaScript frameworks" } ]
                },
                { "name": "Nginx", "confidence": 50, "version": "", "categories": [ { "name": "Web servers" }, { "name": "Reverse proxies" } ] },
                { "name": "", "categories": [] },
                { "slug": "nameless" }
            ]
        });
        let techs = parse_wappalyzer_output(&raw);
        assert_eq!(techs.len(), 2);
        assert_eq!(techs[0].version.as_deref(), Some("18.2.0"));
        assert_eq!(techs[0].category, "JavaScript frameworks");
        assert_eq!(techs[1].version, None);
        assert_eq!(techs[1].confidence, Some(50));
        assert_eq!(techs[1].category, "Web servers, Reverse proxies");
    }
}
