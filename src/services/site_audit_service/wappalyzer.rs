use crate::config::Config;
use crate::error::AnalysisFailure;
use crate::models::tech::DetectedTechnology;
use crate::services::site_audit_service::process::{run_tool, stderr_tail};
use crate::services::site_audit_service::tech_stack::parse_wappalyzer_output;
use log::{debug, info, warn};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

pub const WAPPALYZER: &str = "wappalyzer";

/// A technology detector with an explicit session lifecycle:
/// `init`, `open`, `analyze`, then `destroy`, which must run even when an
/// earlier phase failed.
#[allow(async_fn_in_trait)]
pub trait TechnologyProvider {
    async fn init(&mut self) -> Result<(), AnalysisFailure>;
    async fn open(&mut self, url: &str) -> Result<(), AnalysisFailure>;
    async fn analyze(&mut self) -> Result<Vec<DetectedTechnology>, AnalysisFailure>;
    async fn destroy(&mut self);
}

/// Drives one full provider session for `url`.
pub async fn detect_technologies<P: TechnologyProvider>(
    provider: &mut P,
    url: &str,
) -> Result<Vec<DetectedTechnology>, AnalysisFailure> {
    let result = run_session(provider, url).await;
    provider.destroy().await;
    result
}

async fn run_session<P: TechnologyProvider>(
    provider: &mut P,
    url: &str,
) -> Result<Vec<DetectedTechnology>, AnalysisFailure> {
    provider.init().await?;
    provider.open(url).await?;
    provider.analyze().await
}

/// Wappalyzer CLI run inside a throwaway working directory. The directory is
/// a `TempDir`, so it is removed on `destroy` or when the session is dropped.
pub struct WappalyzerCli {
    bin: String,
    timeout: Duration,
    parent_dir: PathBuf,
    scratch_dir: Option<TempDir>,
    url: Option<String>,
}

impl WappalyzerCli {
    pub fn new(config: &Config) -> Self {
        WappalyzerCli {
            bin: config.wappalyzer_bin.clone(),
            timeout: config.wappalyzer_timeout,
            parent_dir: config.report_dir.clone(),
            scratch_dir: None,
            url: None,
        }
    }

    fn failure(message: String) -> AnalysisFailure {
        AnalysisFailure::ProviderFailed {
            tool: WAPPALYZER.to_string(),
            message,
        }
    }
}

impl TechnologyProvider for WappalyzerCli {
    async fn init(&mut self) -> Result<(), AnalysisFailure> {
        let dir = tempfile::Builder::new()
            .prefix("siteaudit-wappalyzer-")
            .tempdir_in(&self.parent_dir)
            .map_err(|e| {
                Self::failure(format!(
                    "cannot create scratch dir in {}: {}",
                    self.parent_dir.display(),
                    e
                ))
            })?;
        debug!("Wappalyzer session dir {}", dir.path().display());
        self.scratch_dir = Some(dir);
        Ok(())
    }

    async fn open(&mut self, url: &str) -> Result<(), AnalysisFailure> {
        self.url = Some(url.to_string());
        Ok(())
    }

    async fn analyze(&mut self) -> Result<Vec<DetectedTechnology>, AnalysisFailure> {
        let scratch = self
            .scratch_dir
            .as_ref()
            .ok_or_else(|| Self::failure("analyze called before init".to_string()))?;
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| Self::failure("analyze called before open".to_string()))?;

        info!("Running Wappalyzer for {}", url);
        let mut command = Command::new(&self.bin);
        command.arg(url).current_dir(scratch.path());
        let output = run_tool(WAPPALYZER, command, self.timeout).await?;

        if !output.status.success() {
            return Err(Self::failure(stderr_tail(&output)));
        }

        let raw: Value = serde_json::from_slice(&output.stdout).map_err(|e| {
            AnalysisFailure::InvalidStructure(format!("Wappalyzer output is not JSON: {}", e))
        })?;
        let technologies = parse_wappalyzer_output(&raw);
        debug!("Wappalyzer found {} technologies on {}", technologies.len(), url);
        Ok(technologies)
    }

    async fn destroy(&mut self) {
        self.url = None;
        if let Some(dir) = self.scratch_dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                warn!("Failed to remove Wappalyzer scratch dir {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeProvider {
        phases: Vec<&'static str>,
        fail_analyze: bool,
    }

    impl TechnologyProvider for FakeProvider {
        async fn init(&mut self) -> Result<(), AnalysisFailure> {
            self.phases.push("init");
            Ok(())
        }

        async fn open(&mut self, _url: &str) -> Result<(), AnalysisFailure> {
            self.phases.push("open");
            Ok(())
        }

        async fn analyze(&mut self) -> Result<Vec<DetectedTechnology>, AnalysisFailure> {
            self.phases.push("analyze");
            if self.fail_analyze {
                return Err(AnalysisFailure::Timeout {
                    tool: "fake".to_string(),
                    secs: 1,
                });
            }
            Ok(vec![DetectedTechnology {
                name: "Nginx".to_string(),
                version: None,
                confidence: Some(100),
                category: "Web servers".to_string(),
            }])
        }

        async fn destroy(&mut self) {
            self.phases.push("destroy");
        }
    }

    #[tokio::test]
    async fn runs_all_four_phases_in_order() {
        let mut provider = FakeProvider::default();
        let found = detect_technologies(&mut provider, "https://example.com")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(provider.phases, ["init", "open", "analyze", "destroy"]);
    }

    #[tokio::test]
    async fn destroys_after_failed_analyze() {
        let mut provider = FakeProvider {
            fail_analyze: true,
            ..FakeProvider::default()
        };
        let err = detect_technologies(&mut provider, "https://example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisFailure::Timeout { .. }));
        assert_eq!(provider.phases.last(), Some(&"destroy"));
    }

    #[tokio::test]
    async fn missing_cli_is_tool_not_found_and_cleans_up() {
        let reports = TempDir::new().unwrap();
        let config = Config {
            wappalyzer_bin: "/nonexistent/wappalyzer".to_string(),
            report_dir: reports.path().to_path_buf(),
            ..Config::default()
        };
        let mut cli = WappalyzerCli::new(&config);
        let err = detect_technologies(&mut cli, "https://example.com")
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisFailure::ToolNotFound(WAPPALYZER.to_string()));
        assert!(cli.scratch_dir.is_none());
        assert_eq!(std::fs::read_dir(reports.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn analyze_before_init_is_provider_failure() {
        let mut cli = WappalyzerCli::new(&Config::default());
        cli.open("https://example.com").await.unwrap();
        assert!(matches!(
            cli.analyze().await,
            Err(AnalysisFailure::ProviderFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn parses_cli_stdout() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let script = dir.path().join("fake-wappalyzer");
        std::fs::write(
            &script,
            "#!/bin/sh\necho '{\"technologies\":[{\"name\":\"React\",\"version\":\"18.2\",\"confidence\":100,\"categories\":[{\"name\":\"JavaScript frameworks\"}]}]}'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = Config {
            wappalyzer_bin: script.to_string_lossy().into_owned(),
            report_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let mut cli = WappalyzerCli::new(&config);
        let found = detect_technologies(&mut cli, "https://example.com")
            .await
            .unwrap();
        assert_eq!(found[0].name, "React");
        assert_eq!(found[0].version.as_deref(), Some("18.2"));
        // only the script is left; the session dir went with destroy
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
