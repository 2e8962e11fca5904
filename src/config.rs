use anyhow::{anyhow, Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::DEFAULT_DATA_PATH;
use crate::policy::DisplayMode;

/// Main configuration structure for repos-viewer
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// Where the status endpoint lives
    #[serde(default)]
    pub server: ServerConfig,

    /// Initial display-mode toggles
    #[serde(default)]
    pub display: DisplayMode,

    /// Automatic refresh in the terminal dashboard
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Status server connection settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Base URL of repos-server
    #[serde(default = "default_server_url")]
    pub url: String,

    /// Path of the status document
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Origin header to send (must be in the server's allowed origins)
    #[serde(default)]
    pub origin: Option<String>,

    /// Request timeout in seconds (none by default)
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Refresh scheduling
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RefreshConfig {
    /// Auto-refresh interval
    #[serde(default = "default_interval")]
    pub interval: String, // "30s", "5m", "off"
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String, // "info"
}

// Default value functions
fn default_server_url() -> String {
    "http://localhost:5447".to_string()
}
fn default_data_path() -> String {
    DEFAULT_DATA_PATH.to_string()
}
fn default_interval() -> String {
    "30s".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            data_path: default_data_path(),
            origin: None,
            timeout: None,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Parse interval strings like "30s", "5m", "1h", "2d" or raw seconds.
/// "0", "off" and "never" disable the timer.
pub fn parse_interval(interval: &str) -> Result<Option<Duration>> {
    let interval = interval.trim().to_lowercase();

    let (value, unit) = if interval == "off" || interval == "never" {
        ("0", 1)
    } else if let Some(value) = interval.strip_suffix('s') {
        (value, 1)
    } else if let Some(value) = interval.strip_suffix('m') {
        (value, 60)
    } else if let Some(value) = interval.strip_suffix('h') {
        (value, 3600)
    } else if let Some(value) = interval.strip_suffix('d') {
        (value, 86400)
    } else {
        (interval.as_str(), 1)
    };

    let count = value.parse::<u64>().map_err(|_| {
        anyhow!("Invalid interval format '{}'. Use format like '30s', '5m', '1h'", interval)
    })?;
    let secs = count
        .checked_mul(unit)
        .with_context(|| format!("Interval too large: '{}'", interval))?;

    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

impl Config {
    /// Load configuration from the default location or create a default config
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            let config = Self::default();

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }

            config.save(&config_path)?;

            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.expand_vars()?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("repos-viewer").join("config.yml"))
    }

    /// Expand environment variables in the server settings
    pub fn expand_vars(&mut self) -> Result<()> {
        self.server.url = shellexpand::full(&self.server.url)
            .context("Failed to expand server url")?
            .into_owned();

        if let Some(origin) = &self.server.origin {
            self.server.origin = Some(
                shellexpand::full(origin)
                    .context("Failed to expand server origin")?
                    .into_owned(),
            );
        }

        Ok(())
    }

    /// Reject values that would only fail later, at refresh time
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.server.url)
            .with_context(|| format!("Invalid server url: {}", self.server.url))?;
        parse_interval(&self.refresh.interval)
            .with_context(|| format!("Invalid refresh interval: {}", self.refresh.interval))?;
        Ok(())
    }

    /// Auto-refresh period, if enabled
    pub fn refresh_interval(&self) -> Option<Duration> {
        parse_interval(&self.refresh.interval).ok().flatten()
    }
}
