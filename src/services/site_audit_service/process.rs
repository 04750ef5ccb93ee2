use crate::error::AnalysisFailure;
use log::debug;
use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

const STDERR_TAIL: usize = 500;

/// Runs an external tool to completion under a deadline. The child is killed
/// when the deadline passes.
pub async fn run_tool(
    tool: &str,
    mut command: Command,
    limit: Duration,
) -> Result<Output, AnalysisFailure> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command.spawn().map_err(|e| spawn_failure(tool, e))?;
    debug!("Spawned {} (pid {:?})", tool, child.id());

    match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(AnalysisFailure::ProviderFailed {
            tool: tool.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Err(AnalysisFailure::Timeout {
            tool: tool.to_string(),
            secs: limit.as_secs(),
        }),
    }
}

pub fn spawn_failure(tool: &str, error: io::Error) -> AnalysisFailure {
    match error.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            AnalysisFailure::ToolNotFound(tool.to_string())
        }
        _ => AnalysisFailure::ProviderFailed {
            tool: tool.to_string(),
            message: error.to_string(),
        },
    }
}

/// The last few hundred characters of stderr, which is where tools put the reason.
pub fn stderr_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    let start = trimmed
        .char_indices()
        .rev()
        .nth(STDERR_TAIL - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    trimmed[start..].to_string()
}
