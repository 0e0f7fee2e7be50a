use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

/// Shared secret used when neither `admin.api_key` nor `ADMIN_KEY` is provided.
pub const DEFAULT_ADMIN_KEY: &str = "ranna-secret-2025";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Built frontend to serve for unmatched paths, if any.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
    /// `compact` (default) or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            static_dir: None,
            log_format: default_log_format(),
        }
    }
}

/// What the storage layer does when writing a collection fails.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Log and report success (read-only or ephemeral hosts).
    #[default]
    BestEffort,
    /// Surface the failure to the caller.
    Strict,
}

impl std::str::FromStr for WritePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            "strict" => Ok(Self::Strict),
            other => Err(anyhow!("unknown write policy `{other}`; expected best_effort or strict")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_menu_file")]
    pub menu_file: String,
    #[serde(default = "default_orders_file")]
    pub orders_file: String,
    #[serde(default)]
    pub write_policy: WritePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            menu_file: default_menu_file(),
            orders_file: default_orders_file(),
            write_policy: WritePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_key")]
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { api_key: default_admin_key() }
    }
}

// All interfaces, so the service is reachable from outside a container.
fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 5000 }
fn default_log_format() -> String { "compact".into() }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_menu_file() -> String { "menu.json".into() }
fn default_orders_file() -> String { "orders.json".into() }
fn default_admin_key() -> String { DEFAULT_ADMIN_KEY.into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is missing. Environment variables override either source.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.apply_env_overrides()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        // `PORT` is what most PaaS hosts inject; `SERVER_PORT` wins if both are set.
        let port = std::env::var("SERVER_PORT").or_else(|_| std::env::var("PORT"));
        if let Ok(port) = port {
            self.server.port = port
                .parse()
                .map_err(|_| anyhow!("server port `{port}` is not a valid u16"))?;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Ok(dir) = std::env::var("STATIC_DIR") {
            self.server.static_dir = Some(PathBuf::from(dir));
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.server.log_format = format;
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(policy) = std::env::var("WRITE_POLICY") {
            self.storage.write_policy = policy.parse()?;
        }
        if let Ok(key) = std::env::var("ADMIN_KEY") {
            self.admin.api_key = key;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.admin.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.menu_file.trim().is_empty() || self.orders_file.trim().is_empty() {
            return Err(anyhow!("storage.menu_file and storage.orders_file must be non-empty"));
        }
        if self.menu_file == self.orders_file {
            return Err(anyhow!("storage.menu_file and storage.orders_file must differ"));
        }
        Ok(())
    }

    pub fn menu_path(&self) -> PathBuf {
        self.data_dir.join(&self.menu_file)
    }

    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join(&self.orders_file)
    }
}

impl AdminConfig {
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(anyhow!("admin.api_key must not be empty"));
        }
        Ok(())
    }

    pub fn uses_default_key(&self) -> bool {
        self.api_key == DEFAULT_ADMIN_KEY
    }
}
