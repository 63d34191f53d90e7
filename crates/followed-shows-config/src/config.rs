use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TRAKT_API_URL: &str = "https://api.trakt.tv";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub trakt: Option<TraktConfig>,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TraktConfig {
    pub enabled: bool,
    pub client_id: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Username whose lists are managed; `None` means the token's owner ("me")
    #[serde(default)]
    pub user: Option<String>,
}

/// Retry settings for every call made against the list service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_factor")]
    pub factor: f64,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Write logs to a daily-rotated file instead of stderr
    pub file: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_TRAKT_API_URL.to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    1000
}

fn default_factor() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            factor: default_factor(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or fall back to defaults when it does not exist yet
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(anyhow::anyhow!("retry.max_attempts must be at least 1"));
        }
        if !self.retry.factor.is_finite() || self.retry.factor < 1.0 {
            return Err(anyhow::anyhow!("retry.factor must be a finite number >= 1.0"));
        }
        if self.retry.max_delay_ms < self.retry.initial_delay_ms {
            return Err(anyhow::anyhow!("retry.max_delay_ms must not be smaller than retry.initial_delay_ms"));
        }

        let trakt = self.trakt.as_ref()
            .ok_or_else(|| anyhow::anyhow!("Trakt is not configured"))?;
        if !trakt.enabled {
            return Err(anyhow::anyhow!("Trakt is not enabled"));
        }
        if trakt.client_id.is_empty() || trakt.client_id == "YOUR_CLIENT_ID" {
            return Err(anyhow::anyhow!("Trakt client_id is not configured"));
        }
        if !(trakt.api_url.starts_with("https://") || trakt.api_url.starts_with("http://")) {
            return Err(anyhow::anyhow!("Trakt api_url must start with http:// or https://"));
        }

        Ok(())
    }

    pub fn is_trakt_configured(&self) -> bool {
        if let Some(ref trakt) = self.trakt {
            trakt.enabled
                && !trakt.client_id.is_empty()
                && trakt.client_id != "YOUR_CLIENT_ID"
        } else {
            false
        }
    }
}
