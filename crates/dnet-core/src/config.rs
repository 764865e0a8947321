//! Configuration management for the DisasterNet client.
//!
//! Loads configuration from ${DNET_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for configuration and log directories.
    //!
    //! DNET_HOME resolution order:
    //! 1. DNET_HOME environment variable (if set)
    //! 2. ~/.config/dnet (default)
    //! 3. ./.dnet when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the client home directory.
    pub fn dnet_home() -> PathBuf {
        if let Ok(home) = std::env::var("DNET_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".dnet"),
            |h| h.join(".config").join("dnet"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        dnet_home().join("config.toml")
    }

    /// Returns the directory interactive sessions write their log files to.
    pub fn logs_dir() -> PathBuf {
        dnet_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base address of the message board backend.
    pub base_url: String,

    /// Poll interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Per-request timeout in seconds (0 means the maximum)
    pub request_timeout_secs: u64,

    /// Fallback log filter when DNET_LOG is unset.
    pub log_level: String,
}

impl Config {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
    /// Lower bound applied to `poll_interval_ms`.
    pub const MIN_POLL_INTERVAL_MS: u64 = 100;
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
    /// Upper bound applied to `request_timeout_secs`. Every poll ends within
    /// this long, so overlapping polls stay bounded by timeout / interval.
    pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
    const DEFAULT_LOG_LEVEL: &str = "info";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Parses and validates `base_url`.
    ///
    /// # Errors
    /// Returns an error if the URL is malformed or not http(s).
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())
            .with_context(|| format!("Invalid base_url '{}'", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            );
        }
        Ok(url)
    }

    /// Poll interval, clamped to `MIN_POLL_INTERVAL_MS`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(Self::MIN_POLL_INTERVAL_MS))
    }

    /// Per-request timeout. 0 and anything above `MAX_REQUEST_TIMEOUT_SECS`
    /// become the maximum; a request is never left without a deadline.
    pub fn request_timeout(&self) -> Duration {
        let secs = match self.request_timeout_secs {
            0 => Self::MAX_REQUEST_TIMEOUT_SECS,
            secs => secs.min(Self::MAX_REQUEST_TIMEOUT_SECS),
        };
        Duration::from_secs(secs)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: Self::DEFAULT_POLL_INTERVAL_MS,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
