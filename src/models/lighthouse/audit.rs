use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// pub struct for individual audit results
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub score: Option<f64>,
    pub display_value: Option<String>,
    pub numeric_value: Option<f64>,
    pub details: Option<Value>,
}

impl Audit {
    pub fn details_items(&self) -> &[Value] {
        self.details
            .as_ref()
            .and_then(|d| d.get("items"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Audits in the order the provider emitted them.
#[derive(Debug, Clone, Default)]
pub struct AuditMap {
    entries: Vec<(String, Audit)>,
}

impl AuditMap {
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let entries = object
            .iter()
            .filter_map(|(key, value)| match Audit::deserialize(value) {
                Ok(audit) => Some((key.clone(), audit)),
                Err(e) => {
                    debug!("Skipping malformed audit {}: {}", key, e);
                    None
                }
            })
            .collect();
        AuditMap { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Audit> {
        self.entries
            .iter()
            .find(|(id, _)| id == key)
            .map(|(_, audit)| audit)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Audit)> {
        self.entries.iter().map(|(id, audit)| (id.as_str(), audit))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_emission_order() {
        let value = json!({
            "zeta": { "score": 1 },
            "alpha": { "score": 0.2 },
            "mid": { "score": null }
        });
        let audits = AuditMap::from_object(value.as_object().unwrap());
        let keys: Vec<&str> = audits.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(audits.get("mid").unwrap().score, None);
    }

    #[test]
    fn skips_audits_that_are_not_objects() {
        let value = json!({ "ok": { "score": 0.5 }, "broken": "nope" });
        let audits = AuditMap::from_object(value.as_object().unwrap());
        assert_eq!(audits.len(), 1);
        assert!(audits.get("broken").is_none());
    }
}
