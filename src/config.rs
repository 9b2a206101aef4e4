use crate::influx::{DEFAULT_BUCKET, DEFAULT_ORG};
use serde::Deserialize;
use std::time::Duration;

/// Overrides `backend.token` so the secret can stay out of the file.
pub const TOKEN_ENV: &str = "STALKER_BACKEND_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Machine identity tag; defaults to the host name.
    #[serde(default)]
    pub machine_name: Option<String>,
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// When set, serve on this unix socket instead of TCP.
    #[serde(default)]
    pub unix_socket: Option<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8090
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Empty or absent: run with the in-memory repository.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_org")]
    pub org: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_buffer_duration_ms")]
    pub buffer_duration_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long startup waits for the backend health check; 0 skips the wait.
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: String::new(),
            org: default_org(),
            bucket: default_bucket(),
            buffer_duration_ms: default_buffer_duration_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            ready_timeout_secs: default_ready_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }

    pub fn buffer_duration(&self) -> Duration {
        Duration::from_millis(self.buffer_duration_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_org() -> String {
    DEFAULT_ORG.into()
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.into()
}

fn default_buffer_duration_ms() -> u64 {
    60_000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_ready_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the container metrics source REST API.
    pub url: String,
    #[serde(default = "default_source_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_source_timeout_secs() -> u64 {
    10
}

impl SourceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_scrape_interval_secs")]
    pub scrape_interval_secs: u64,
    /// How often to log agent stats at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            scrape_interval_secs: default_scrape_interval_secs(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

fn default_scrape_interval_secs() -> u64 {
    20
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("read config {}: {}", path, e))?;
        let mut config = Self::load_from_str(&s)?;
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            config.backend.token = token;
        }
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.server.unix_socket.is_none() {
            anyhow::ensure!(
                self.server.port > 0,
                "server.port must be between 1 and 65535, got {}",
                self.server.port
            );
        }
        anyhow::ensure!(
            self.server
                .unix_socket
                .as_deref()
                .is_none_or(|p| !p.is_empty()),
            "server.unix_socket must be non-empty when set"
        );
        anyhow::ensure!(!self.source.url.is_empty(), "source.url must be non-empty");
        anyhow::ensure!(
            self.source.request_timeout_secs > 0,
            "source.request_timeout_secs must be > 0, got {}",
            self.source.request_timeout_secs
        );
        if self.backend.is_configured() {
            anyhow::ensure!(
                !self.backend.org.is_empty(),
                "backend.org must be non-empty"
            );
            anyhow::ensure!(
                !self.backend.bucket.is_empty(),
                "backend.bucket must be non-empty"
            );
        }
        anyhow::ensure!(
            self.backend.buffer_duration_ms > 0,
            "backend.buffer_duration_ms must be > 0, got {}",
            self.backend.buffer_duration_ms
        );
        anyhow::ensure!(
            self.backend.request_timeout_secs > 0,
            "backend.request_timeout_secs must be > 0, got {}",
            self.backend.request_timeout_secs
        );
        anyhow::ensure!(
            self.monitoring.scrape_interval_secs > 0,
            "monitoring.scrape_interval_secs must be > 0, got {}",
            self.monitoring.scrape_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }

    /// Configured machine name, else the host name.
    pub fn machine_name(&self) -> String {
        self.machine_name
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(sysinfo::System::host_name)
            .unwrap_or_else(|| "unknown".into())
    }
}
