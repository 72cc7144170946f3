use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

fn default_port() -> u16 {
    8091
}

fn default_host() -> String {
    "0.0.0.0".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitoringConfig {
    /// Containers to poll, in pass order.
    #[serde(default = "default_containers")]
    pub containers: Vec<String>,
    /// Pause between passes; the period is pass duration plus this.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Upper bound on each runtime call.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            containers: default_containers(),
            interval_secs: default_interval_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_containers() -> Vec<String> {
    vec![
        "k6-browser".into(),
        "playwright".into(),
        "chrome-debug".into(),
    ]
}

fn default_interval_secs() -> u64 {
    5
}

fn default_fetch_timeout_secs() -> u64 {
    3
}

impl AppConfig {
    /// Load from `CONFIG_FILE`, else `config.toml`, else built-in defaults.
    /// An explicit `CONFIG_FILE` must exist.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_path(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from_path(DEFAULT_CONFIG_PATH)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            !self.monitoring.containers.is_empty(),
            "monitoring.containers must list at least one container"
        );
        anyhow::ensure!(
            self.monitoring.containers.iter().all(|c| !c.trim().is_empty()),
            "monitoring.containers must not contain empty names"
        );
        let mut seen = HashSet::new();
        for c in &self.monitoring.containers {
            anyhow::ensure!(
                seen.insert(c.as_str()),
                "monitoring.containers lists {} more than once",
                c
            );
        }
        anyhow::ensure!(
            self.monitoring.interval_secs > 0,
            "monitoring.interval_secs must be > 0, got {}",
            self.monitoring.interval_secs
        );
        anyhow::ensure!(
            self.monitoring.fetch_timeout_secs > 0,
            "monitoring.fetch_timeout_secs must be > 0, got {}",
            self.monitoring.fetch_timeout_secs
        );
        Ok(())
    }
}
