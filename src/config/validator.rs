//! Configuration validator for Remote-Memory
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{CacheConfig, Config, ConfigError, LoggingConfig, ReaderConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_reader(&config.reader)?;
        Self::validate_cache(&config.cache)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    fn validate_reader(reader: &ReaderConfig) -> Result<(), ConfigError> {
        if reader.max_read_size == Some(0) {
            return Err(ConfigError::Invalid(
                "Maximum read size must be at least 1 byte".to_string(),
            ));
        }

        if reader.max_interrupt_retries == 0 || reader.max_interrupt_retries > 1024 {
            return Err(ConfigError::Invalid(
                "Interrupt retries must be between 1 and 1024".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_cache(cache: &CacheConfig) -> Result<(), ConfigError> {
        if cache.max_entries == 0 || cache.max_entries > 4096 {
            return Err(ConfigError::Invalid(
                "Cache entries must be between 1 and 4096".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {}",
                logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
