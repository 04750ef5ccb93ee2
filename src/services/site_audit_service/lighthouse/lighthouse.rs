use crate::config::Config;
use crate::error::AnalysisFailure;
use crate::services::site_audit_service::process::{run_tool, stderr_tail};
use crate::utils::{remove_report, temp_report_path};
use log::{info, warn};
use serde_json::Value;
use std::path::Path;
use tokio::process::Command;

pub const LIGHTHOUSE: &str = "lighthouse";

/// Runs the Lighthouse CLI against `url` and returns its raw JSON report.
/// The report file is deleted whether or not the run succeeded.
pub async fn run_lighthouse(config: &Config, url: &str) -> Result<Value, AnalysisFailure> {
    let output_path = temp_report_path(&config.report_dir, url);
    let result = invoke(config, url, &output_path).await;
    remove_report(&output_path).await;
    result
}

pub fn lighthouse_command(config: &Config, url: &str, output_path: &Path) -> Command {
    let mut command = Command::new(&config.lighthouse_bin);
    command
        .arg(url)
        .arg("--output=json")
        .arg("--output-path")
        .arg(output_path)
        .arg("--quiet")
        .arg("--no-enable-error-reporting")
        .arg("--chrome-flags=--headless --no-sandbox")
        .arg(format!(
            "--max-wait-for-load={}",
            config.lighthouse_timeout.as_millis() / 2
        ));
    command
}

async fn invoke(config: &Config, url: &str, output_path: &Path) -> Result<Value, AnalysisFailure> {
    info!("Running Lighthouse for {}", url);
    let output = run_tool(
        LIGHTHOUSE,
        lighthouse_command(config, url, output_path),
        config.lighthouse_timeout,
    )
    .await?;

    let report = read_report(output_path).await;

    if !output.status.success() {
        // A page that fails to load still yields a report carrying runtimeError.
        if let Some(report) = report {
            warn!("Lighthouse exited with {} for {}, using its report", output.status, url);
            return Ok(report);
        }
        return Err(AnalysisFailure::ProviderFailed {
            tool: LIGHTHOUSE.to_string(),
            message: stderr_tail(&output),
        });
    }

    report.ok_or_else(|| {
        AnalysisFailure::InvalidStructure("Lighthouse produced no readable JSON report".to_string())
    })
}

async fn read_report(path: &Path) -> Option<Value> {
    let bytes = tokio::fs::read(path).await.ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Lighthouse report {} is not valid JSON: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_carries_output_flags() {
        let config = Config::default();
        let path = Path::new("/tmp/report.json");
        let command = lighthouse_command(&config, "https://example.com", path);
        let args: Vec<String> = command
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args[0], "https://example.com");
        assert!(args.contains(&"--output=json".to_string()));
        assert!(args.contains(&"/tmp/report.json".to_string()));
        assert!(args.contains(&"--max-wait-for-load=60000".to_string()));
    }

    #[tokio::test]
    async fn missing_binary_surfaces_tool_not_found() {
        let config = Config {
            lighthouse_bin: "/nonexistent/lighthouse".to_string(),
            ..Config::default()
        };
        let err = run_lighthouse(&config, "https://example.com").await.unwrap_err();
        assert_eq!(err, AnalysisFailure::ToolNotFound(LIGHTHOUSE.to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn reads_and_deletes_report_file() {
        use std::os::unix::fs::PermissionsExt;

        // a stand-in CLI that writes a fixed report to the --output-path argument
        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("fake-lighthouse");
        std::fs::write(
            &script,
            "#!/bin/sh\nwhile [ \"$1\" != \"--output-path\" ]; do shift; done\necho '{\"categories\":{\"performance\":{\"score\":0.9}},\"audits\":{}}' > \"$2\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = Config {
            lighthouse_bin: script.to_string_lossy().into_owned(),
            report_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let report = run_lighthouse(&config, "https://example.com").await.unwrap();
        assert_eq!(report["categories"]["performance"]["score"], 0.9);

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == "json"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
