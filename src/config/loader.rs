//! Configuration loader for Remote-Memory
//!
//! Loads configuration from TOML files; missing sections and fields fall back
//! to the defaults.

use super::defaults::default_config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File read by [`load_config`]
pub const DEFAULT_CONFIG_FILE: &str = "remote-memory.toml";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_reader")]
    pub reader: ReaderConfig,

    #[serde(default = "default_cache")]
    pub cache: CacheConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Reader limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Largest accepted read in bytes; unlimited when absent
    #[serde(
        default = "default_max_read_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_read_size: Option<usize>,
    #[serde(default = "default_max_interrupt_retries")]
    pub max_interrupt_retries: u32,
}

/// Handle cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, returning defaults only when the file is absent.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads configuration from the default location
pub fn load_config() -> Result<Config, ConfigError> {
    ConfigLoader::new(DEFAULT_CONFIG_FILE).load_or_default()
}

// Default functions for serde
fn default_reader() -> ReaderConfig {
    let defaults = default_config();
    ReaderConfig {
        max_read_size: defaults.reader.max_read_size,
        max_interrupt_retries: defaults.reader.max_interrupt_retries,
    }
}

fn default_cache() -> CacheConfig {
    let defaults = default_config();
    CacheConfig {
        enabled: defaults.cache.enabled,
        max_entries: defaults.cache.max_entries,
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_config().logging.level,
    }
}

// Individual field defaults
fn default_max_read_size() -> Option<usize> {
    default_config().reader.max_read_size
}

fn default_max_interrupt_retries() -> u32 {
    default_config().reader.max_interrupt_retries
}

fn default_cache_enabled() -> bool {
    default_config().cache.enabled
}

fn default_max_entries() -> usize {
    default_config().cache.max_entries
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reader: default_reader(),
            cache: default_cache(),
            logging: default_logging(),
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        default_reader()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        default_cache()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        default_logging()
    }
}
