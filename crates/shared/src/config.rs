//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::AppResult;
use crate::types::MemberId;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Ledger snapshot configuration.
    pub snapshot: SnapshotConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Monthly context to build alongside the report, if any.
    #[serde(default)]
    pub insight: Option<InsightConfig>,
}

/// Where the ledger snapshot is read from.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    /// Path to the JSON snapshot file.
    pub path: PathBuf,
}

/// Member and month the monthly context is built for.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightConfig {
    /// The member whose spending is summarized.
    pub member: MemberId,
    /// Month key, "YYYY-MM".
    pub month: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "splitbook=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("SPLITBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
