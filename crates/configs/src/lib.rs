use std::path::Path;
use std::time::Duration;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_ads_server")]
    pub ads: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ads: default_ads_server(),
            auth: AuthConfig::default(),
            gateway: GatewayConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

/// Listener settings shared by the three services.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// Left out of a section, it falls back to that service's default port.
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl ServerConfig {
    fn new(port: u16) -> Self {
        Self { host: default_host(), port: Some(port), worker_threads: Some(4) }
    }

    /// `host:port`; the port is settled by `AppConfig::normalize_and_validate`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(flatten)]
    pub server: ServerConfig,
    #[serde(default = "default_allow_list_path")]
    pub allow_list_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { server: ServerConfig::new(DEFAULT_AUTH_PORT), allow_list_path: default_allow_list_path() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub server: ServerConfig,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_ads_url")]
    pub ads_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::new(DEFAULT_GATEWAY_PORT),
            auth_url: default_auth_url(),
            ads_url: default_ads_url(),
            request_timeout_secs: default_request_timeout(),
            readiness: ReadinessConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Startup barrier: wait `grace_secs`, then poll upstream health every
/// `interval_secs`, giving up after `max_attempts` rounds.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_grace")]
    pub grace_secs: u64,
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            grace_secs: default_grace(),
            interval_secs: default_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ReadinessConfig {
    pub fn grace(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_uri")]
    pub uri: String,
    #[serde(default = "default_database_name")]
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { uri: default_database_uri(), name: default_database_name() }
    }
}

const DEFAULT_ADS_PORT: u16 = 8001;
const DEFAULT_AUTH_PORT: u16 = 8002;
const DEFAULT_GATEWAY_PORT: u16 = 8000;

fn default_host() -> String { "127.0.0.1".into() }
fn default_ads_server() -> ServerConfig { ServerConfig::new(DEFAULT_ADS_PORT) }
fn default_allow_list_path() -> String { "data/student_db.json".into() }
fn default_auth_url() -> String { "http://127.0.0.1:8002".into() }
fn default_ads_url() -> String { "http://127.0.0.1:8001".into() }
fn default_request_timeout() -> u64 { 5 }
fn default_grace() -> u64 { 5 }
fn default_interval() -> u64 { 2 }
fn default_max_attempts() -> u32 { 10 }
fn default_database_uri() -> String { "mongodb://localhost:27017".into() }
fn default_database_name() -> String { "ads_db".into() }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (default `config.toml`), fall back to built-in
    /// defaults when the file does not exist, apply environment overrides
    /// and validate. A file that exists but does not parse is an error.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if Path::new(&path).exists() {
            load_from_file(&path).map_err(|e| anyhow!("cannot load {path}: {e}"))?
        } else {
            AppConfig::default()
        };
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override selected settings from `lookup` (normally the process
    /// environment): `MONGO_URI`, `MONGO_DB`, `AUTH_URL`, `ADS_URL`,
    /// `ALLOW_LIST_PATH`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty("MONGO_URI") { self.database.uri = v; }
        if let Some(v) = non_empty("MONGO_DB") { self.database.name = v; }
        if let Some(v) = non_empty("AUTH_URL") { self.gateway.auth_url = v; }
        if let Some(v) = non_empty("ADS_URL") { self.gateway.ads_url = v; }
        if let Some(v) = non_empty("ALLOW_LIST_PATH") { self.auth.allow_list_path = v; }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化各服务监听配置
        self.ads.normalize("ads", DEFAULT_ADS_PORT)?;
        self.auth.server.normalize("auth", DEFAULT_AUTH_PORT)?;
        self.gateway.server.normalize("gateway", DEFAULT_GATEWAY_PORT)?;
        self.gateway.normalize_and_validate()?;
        self.database.validate()?;
        if self.auth.allow_list_path.trim().is_empty() {
            return Err(anyhow!("auth.allow_list_path must not be empty"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self, section: &str, default_port: u16) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if *self.port.get_or_insert(default_port) == 0 {
            return Err(anyhow!("{section}.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl GatewayConfig {
    fn normalize_and_validate(&mut self) -> Result<()> {
        self.auth_url = normalize_base_url("gateway.auth_url", &self.auth_url)?;
        self.ads_url = normalize_base_url("gateway.ads_url", &self.ads_url)?;
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("gateway.request_timeout_secs must be a positive number of seconds"));
        }
        if self.readiness.interval_secs == 0 || self.readiness.max_attempts == 0 {
            return Err(anyhow!("gateway.readiness interval_secs and max_attempts must be positive"));
        }
        Ok(())
    }
}

fn normalize_base_url(field: &str, url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let lower = trimmed.to_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(anyhow!("{field} must start with http:// or https://"));
    }
    Ok(trimmed.to_string())
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        let lower = self.uri.trim().to_lowercase();
        if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
            return Err(anyhow!("database.uri must start with mongodb:// or mongodb+srv://"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("database.name must not be empty"));
        }
        Ok(())
    }
}
