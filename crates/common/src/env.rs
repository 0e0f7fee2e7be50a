//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Ensure the data directory exists; warn when an optional static directory is missing.
///
/// Failing to create the data directory is not fatal: on read-only hosts the
/// collections are simply read as empty and writes are handled by the
/// storage write policy.
pub async fn ensure_env(static_dir: Option<&Path>, data_dir: &Path) -> anyhow::Result<()> {
    if let Some(dir) = static_dir {
        if tokio::fs::metadata(dir).await.is_err() {
            warn!(static_dir = %dir.display(), "static assets directory not found; static assets may 404");
        }
    }
    if let Err(e) = tokio::fs::create_dir_all(data_dir).await {
        warn!(data_dir = %data_dir.display(), error = %e, "cannot create data directory; storage may be read-only");
    }
    Ok(())
}
