//! Data directory layout.

use std::path::{Path, PathBuf};

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `LARDER_DATA_DIR` environment variable
/// 2. `~/.larder`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LARDER_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".larder");
    }

    // Last resort: current directory
    PathBuf::from(".larder")
}

/// SQLite URL for the session autosave database inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("larder.db").display())
}

/// Create the data directory if needed.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}
