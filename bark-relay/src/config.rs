//! Configuration for the relay.
//!
//! Configuration is loaded from an optional TOML file and then overridden by
//! command-line flags. The core only ever sees a validated [`RelayConfig`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Icon shown on Bark notifications unless configured otherwise.
pub const DEFAULT_ICON: &str = "https://day.app/assets/images/avatar.jpg";

/// Root configuration for the relay.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Gotify source configuration.
    pub gotify: GotifyConfig,
    /// Bark target configuration.
    pub bark: BarkConfig,
    /// Reconnect policy.
    pub reconnect: ReconnectConfig,
}

/// Gotify source configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GotifyConfig {
    /// Gotify server URL, e.g. `https://gotify.example.com`.
    pub host: String,
    /// Client token used to subscribe to `/stream`.
    pub token: String,
    /// Verify the Gotify server's TLS certificate (default: false).
    ///
    /// Disabled by default to keep working against self-signed Gotify
    /// deployments. A warning is logged at startup while it is off.
    pub tls_verify: bool,
}

/// Bark target configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BarkConfig {
    /// Bark push URL, e.g. `https://api.day.app/DEVICE_KEY`.
    pub target: String,
    /// Icon URL for notifications.
    pub icon: String,
    /// AES key (16, 24 or 32 bytes of text). Enables encrypted pushes.
    pub aes_key: Option<String>,
    /// Fixed AES IV (16 bytes of text). A random IV is used per message if unset.
    pub aes_iv: Option<String>,
    /// Basic auth username for the Bark server.
    pub user: Option<String>,
    /// Basic auth password for the Bark server.
    pub password: Option<String>,
}

/// Reconnect policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Delay in seconds before redialing after a stream failure (default: 5).
    pub delay_secs: u64,
}

impl Default for BarkConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            icon: DEFAULT_ICON.to_string(),
            aes_key: None,
            aes_iv: None,
            user: None,
            password: None,
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self { delay_secs: 5 }
    }
}

impl RelayConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check the fields the relay cannot start without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gotify.host.is_empty() {
            return Err(ConfigError::Missing("gotify host"));
        }
        if self.gotify.token.is_empty() {
            return Err(ConfigError::Missing("gotify token"));
        }
        if self.bark.target.is_empty() {
            return Err(ConfigError::Missing("bark target"));
        }
        Ok(())
    }

    /// Delay before redialing the stream.
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect.delay_secs)
    }
}

impl BarkConfig {
    /// AES key, if encryption is enabled.
    pub fn aes_key(&self) -> Option<&str> {
        non_empty(&self.aes_key)
    }

    /// Fixed AES IV, if configured.
    pub fn aes_iv(&self) -> Option<&str> {
        non_empty(&self.aes_iv)
    }

    /// Basic auth credentials, if either half is configured.
    pub fn basic_auth(&self) -> Option<(String, String)> {
        let user = non_empty(&self.user);
        let password = non_empty(&self.password);
        if user.is_none() && password.is_none() {
            return None;
        }
        Some((
            user.unwrap_or_default().to_string(),
            password.unwrap_or_default().to_string(),
        ))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting is missing or empty.
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
