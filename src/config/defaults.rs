//! Default configuration values for Remote-Memory

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub reader: ReaderDefaults,
    pub cache: CacheDefaults,
    pub logging: LoggingDefaults,
}

/// Default reader limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_read_size: Option<usize>,
    pub max_interrupt_retries: u32,
}

/// Default handle cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheDefaults {
    pub enabled: bool,
    pub max_entries: usize,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        reader: ReaderDefaults {
            max_read_size: None, // unlimited
            max_interrupt_retries: 16,
        },
        cache: CacheDefaults {
            enabled: false,
            max_entries: 16,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}
