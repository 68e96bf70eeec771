use crate::application::DEFAULT_MAX_WRITE_ATTEMPTS;
use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "hotel-ledger";

/// Prefix for environment overrides, e.g. `HOTEL_LEDGER__LOGGING__LEVEL=debug`.
pub const CONFIG_ENV_PREFIX: &str = "HOTEL_LEDGER";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub storage: StorageConfig,
    pub ledger: LedgerSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// RocksDB directory. Unset means in-memory storage.
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// How many times a conflicting update is re-read and re-applied.
    pub max_write_attempts: u32,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from, in increasing priority:
    /// 1. built-in defaults
    /// 2. `hotel-ledger.yaml` in the working directory (optional)
    /// 3. the file at `path` (required when given)
    /// 4. `HOTEL_LEDGER__*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        use ::config::{Config, Environment, File, FileFormat};

        let mut builder = Config::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(path) = path {
            builder = builder.add_source(
                File::new(&path.to_string_lossy(), FileFormat::Yaml).required(true),
            );
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
