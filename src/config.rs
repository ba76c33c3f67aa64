//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\playlist-forge\config.toml
//! - macOS: ~/Library/Application Support/playlist-forge/config.toml
//! - Linux: ~/.config/playlist-forge/config.toml
//!
//! The cached OAuth token lives next to it as `token.json`. Values given on
//! the command line or in the environment override what the file says.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::spotify::OAuthConfig;
use crate::publisher::{MAX_BATCH_SIZE, PublishOptions};
use crate::scanner::DEFAULT_EXTENSIONS;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog application credentials
    pub credentials: Credentials,

    /// File discovery settings
    pub matching: MatchingConfig,

    /// Playlist publishing settings
    pub publish: PublishConfig,
}

/// Catalog application credentials
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

impl Credentials {
    /// Fill unset values from `other`.
    pub fn or(self, other: &Credentials) -> Credentials {
        Credentials {
            client_id: self.client_id.or_else(|| other.client_id.clone()),
            client_secret: self.client_secret.or_else(|| other.client_secret.clone()),
            redirect_uri: self.redirect_uri.or_else(|| other.redirect_uri.clone()),
        }
    }

    /// Check every value is present and non-blank.
    pub fn validate(&self) -> Result<OAuthConfig, ConfigError> {
        let client_id = required(&self.client_id, "client id")?;
        let client_secret = required(&self.client_secret, "client secret")?;
        let redirect_uri = required(&self.redirect_uri, "redirect URI")?;
        Ok(OAuthConfig::new(client_id, client_secret, redirect_uri))
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingCredential(name))
}

/// File discovery settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Audio file extensions to consider
    pub extensions: Vec<String>,

    /// Walk subfolders by default
    pub recursive: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            recursive: false,
        }
    }
}

/// Playlist publishing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Tracks per append call (1-100)
    pub batch_size: usize,

    /// Pause between append calls
    pub batch_delay_ms: u64,

    /// Whether new playlists are public
    pub public: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            batch_delay_ms: 500,
            public: true,
        }
    }
}

impl PublishConfig {
    pub fn options(&self) -> PublishOptions {
        PublishOptions {
            batch_size: self.batch_size.clamp(1, MAX_BATCH_SIZE),
            batch_delay: Duration::from_millis(self.batch_delay_ms),
            public: self.public,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("playlist-forge"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Get the path of the cached OAuth token
pub fn token_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("token.json"))
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
    load_from(&path)
}

/// Load configuration from a specific file
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to a specific file
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
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
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "Missing {0}: pass it as a flag, set the SPOTIPY_* environment variable, or add it to config.toml"
    )]
    MissingCredential(&'static str),

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
