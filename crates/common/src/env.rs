//! Environment/runtime helpers
//!
//! Sanity checks on the directories the web app reads at startup. Nothing
//! here is created: the quote files are optional and a missing static
//! directory only means assets will 404.

use std::path::Path;

use tracing::warn;

/// What `ensure_env` found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvReport {
    pub static_dir_present: bool,
    pub data_dir_present: bool,
}

/// Check the static asset directory and `<base_path>/data`; warn on missing ones.
pub async fn ensure_env(static_dir: &str, base_path: &str) -> anyhow::Result<EnvReport> {
    let static_dir_present = is_dir(static_dir).await;
    if !static_dir_present {
        warn!(%static_dir, "static assets directory not found; static assets may 404");
    }

    let data_dir = Path::new(base_path).join("data");
    let data_dir_present = is_dir(&data_dir).await;
    if !data_dir_present {
        warn!(data_dir = %data_dir.display(), "quote data directory not found; serving fallback quote");
    }

    Ok(EnvReport { static_dir_present, data_dir_present })
}

async fn is_dir(path: impl AsRef<Path>) -> bool {
    tokio::fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}
