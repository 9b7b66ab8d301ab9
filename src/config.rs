//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\lyrics-seeds\config.toml
//! - macOS: ~/Library/Application Support/lyrics-seeds/config.toml
//! - Linux: ~/.config/lyrics-seeds/config.toml
//!
//! The config file is human-readable and editable. The Apiseeds API key is
//! stored under `[credentials] apiseeds_apikey` and read through the
//! [`CredentialStore`] trait before every lookup.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Setting key holding the Apiseeds API key.
pub const APIKEY_SETTING: &str = "apiseeds_apikey";

/// Key-value access to stored credentials.
pub trait CredentialStore: Send + Sync {
    /// Current value for `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials
    pub credentials: Credentials,

    /// Lyrics service endpoint and rate policy
    pub service: ServiceConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Apiseeds API key (get one at https://apiseeds.com)
    pub apiseeds_apikey: Option<String>,
}

/// Lyrics service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Lyrics service hostname
    pub host: String,

    /// Lyrics service port (443 uses https, anything else plain http)
    pub port: u16,

    /// Request ceiling per minute, converted to a minimum spacing
    pub requests_per_minute: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: crate::lyrics::APISEEDS_HOST.to_string(),
            port: crate::lyrics::APISEEDS_PORT,
            requests_per_minute: crate::lyrics::REQUESTS_PER_MINUTE,
        }
    }
}

impl ServiceConfig {
    /// Minimum spacing between two requests to the service.
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(60_000 / u64::from(self.requests_per_minute.max(1)))
    }
}

impl Config {
    /// Read a setting by key. Only a value that was never set reads as `None`.
    pub fn get_setting(&self, key: &str) -> Option<String> {
        match key {
            APIKEY_SETTING => self.credentials.apiseeds_apikey.clone(),
            _ => None,
        }
    }

    /// Write a setting by key.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            APIKEY_SETTING => {
                self.credentials.apiseeds_apikey = Some(value.to_string());
                Ok(())
            }
            _ => Err(ConfigError::UnknownSetting(key.to_string())),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lyrics-seeds"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// Save configuration to an explicit path
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Settings (credential store)
// ============================================================================

/// Live configuration, optionally backed by a file.
///
/// Implements [`CredentialStore`]; `set` persists to the backing file when
/// there is one.
#[derive(Debug, Default)]
pub struct Settings {
    config: RwLock<Config>,
    path: Option<PathBuf>,
}

impl Settings {
    /// Settings that live only in memory.
    pub fn in_memory(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            path: None,
        }
    }

    /// Open settings backed by `path`, starting from defaults if the file
    /// does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = if path.exists() {
            load_from(&path)?
        } else {
            Config::default()
        };
        Ok(Self {
            config: RwLock::new(config),
            path: Some(path),
        })
    }

    /// Open settings at the default config location.
    pub fn open_default() -> Self {
        Self {
            config: RwLock::new(load()),
            path: config_path(),
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl CredentialStore for Settings {
    fn get(&self, key: &str) -> Option<String> {
        self.config.read().get_setting(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut config = self.config.write();
        config.set_setting(key, value)?;
        if let Some(path) = &self.path {
            save_to(&config, path)?;
        }
        Ok(())
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
