use log::warn;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

pub fn sanitize_filename(url: &str) -> String {
    url.replace(|c: char| !c.is_alphanumeric() && c != '.', "_")
}

/// A fresh, unique path for one provider run's JSON output.
pub fn temp_report_path(dir: &Path, url: &str) -> PathBuf {
    let stem: String = sanitize_filename(url).chars().take(64).collect();
    dir.join(format!("{}-{}.json", stem, Uuid::new_v4()))
}

/// Best-effort removal; a missing file is not an error.
pub async fn remove_report(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to delete report {}: {}", path.display(), e),
    }
}
