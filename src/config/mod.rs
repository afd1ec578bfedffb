//! Configuration module for Remote-Memory
//!
//! Provides configuration loading, validation, and default settings.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, ConfigLoader, DEFAULT_CONFIG_FILE};
pub use validator::{validate_config, ConfigValidator};

// Re-export the configuration structures
pub use loader::{CacheConfig, Config, LoggingConfig, ReaderConfig};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
