//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates can import
//! `service::runtime::ensure_env` next to the stores it prepares for.

use configs::AppConfig;

/// Ensure the data directory exists; warn on a missing static directory.
pub async fn ensure_env(cfg: &AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(cfg.server.static_dir.as_deref(), &cfg.storage.data_dir).await
}
