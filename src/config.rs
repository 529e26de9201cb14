//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\catalog-tagger\config.toml
//! - macOS: ~/Library/Application Support/catalog-tagger/config.toml
//! - Linux: ~/.config/catalog-tagger/config.toml
//!
//! The config file is human-readable and editable. CLI flags override the
//! library root and database path for a single run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of tag writes allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_WRITES: usize = 4;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library location settings
    pub library: LibraryConfig,

    /// Tag writer settings
    pub writer: WriterConfig,
}

/// Library location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Root directory that catalog file and artwork paths are relative to
    pub root: PathBuf,

    /// SQLite catalog file (defaults to `<root>/local.db`)
    pub database: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: default_library_root(),
            database: None,
        }
    }
}

impl LibraryConfig {
    /// Catalog database path, falling back to `local.db` under the root.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| self.root.join("local.db"))
    }
}

/// Tag writer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Size of the admission gate for batch writes
    pub max_concurrent_writes: usize,

    /// Program used to re-mux MP4 containers (name on PATH or absolute path)
    pub remux_tool: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            max_concurrent_writes: DEFAULT_MAX_CONCURRENT_WRITES,
            remux_tool: "ffmpeg".to_string(),
        }
    }
}

/// Platform data directory for the catalog (`~/.local/share/catalog-tagger` on Linux)
fn default_library_root() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("catalog-tagger"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("catalog-tagger"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
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

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &dir.join("config.toml"))
}

/// Save configuration to `path`, creating its directory.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let dir = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
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
