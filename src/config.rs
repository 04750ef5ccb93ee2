use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3043";
pub const PAGESPEED_API_KEY_VAR: &str = "PAGESPEED_API_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// Required by the mobile-friendly category; there is no built-in fallback key.
    pub pagespeed_api_key: Option<String>,
    pub pagespeed_endpoint: String,
    pub lighthouse_bin: String,
    pub wappalyzer_bin: String,
    pub lighthouse_timeout: Duration,
    pub pagespeed_timeout: Duration,
    pub wappalyzer_timeout: Duration,
    pub probe_timeout: Duration,
    pub report_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            pagespeed_api_key: None,
            pagespeed_endpoint: "https://www.googleapis.com/pagespeedonline/v5/runPagespeed"
                .to_string(),
            lighthouse_bin: "lighthouse".to_string(),
            wappalyzer_bin: "wappalyzer".to_string(),
            lighthouse_timeout: Duration::from_secs(120),
            pagespeed_timeout: Duration::from_secs(60),
            wappalyzer_timeout: Duration::from_secs(60),
            probe_timeout: Duration::from_secs(15),
            report_dir: std::env::temp_dir(),
        }
    }
}

impl Config {
    /// Reads the process environment (after `.env`, if any, was loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let string = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };
        let seconds = |key: &str, default: Duration| -> Result<Duration> {
            match lookup(key).map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => {
                    let secs: u64 = v
                        .parse()
                        .with_context(|| format!("{} must be a whole number of seconds", key))?;
                    Ok(Duration::from_secs(secs))
                }
                _ => Ok(default),
            }
        };

        Ok(Config {
            bind_addr: string("BIND_ADDR", defaults.bind_addr),
            pagespeed_api_key: lookup(PAGESPEED_API_KEY_VAR)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            pagespeed_endpoint: string("PAGESPEED_ENDPOINT", defaults.pagespeed_endpoint),
            lighthouse_bin: string("LIGHTHOUSE_BIN", defaults.lighthouse_bin),
            wappalyzer_bin: string("WAPPALYZER_BIN", defaults.wappalyzer_bin),
            lighthouse_timeout: seconds("LIGHTHOUSE_TIMEOUT_SECS", defaults.lighthouse_timeout)?,
            pagespeed_timeout: seconds("PAGESPEED_TIMEOUT_SECS", defaults.pagespeed_timeout)?,
            wappalyzer_timeout: seconds("WAPPALYZER_TIMEOUT_SECS", defaults.wappalyzer_timeout)?,
            probe_timeout: seconds("PROBE_TIMEOUT_SECS", defaults.probe_timeout)?,
            report_dir: lookup("REPORT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.report_dir),
        })
    }
}
