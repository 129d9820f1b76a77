//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger engine configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// What recalculation does with a stored category that no approved request
/// references any more.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleCategoryPolicy {
    /// Reset the stored amount to zero.
    #[default]
    Zero,
    /// Keep the stored amount as it is.
    Preserve,
}

/// Ledger engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Deadline for a single storage round-trip, in milliseconds.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    /// How many times recalculation retries after a concurrent write.
    #[serde(default = "default_recalculation_max_retries")]
    pub recalculation_max_retries: u32,
    /// Handling of stale categories during recalculation.
    #[serde(default)]
    pub stale_category_policy: StaleCategoryPolicy,
}

impl LedgerConfig {
    /// Storage deadline as a `Duration`.
    #[must_use]
    pub const fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout_ms(),
            recalculation_max_retries: default_recalculation_max_retries(),
            stale_category_policy: StaleCategoryPolicy::default(),
        }
    }
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

fn default_recalculation_max_retries() -> u32 {
    3
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot loaded into the in-memory store at startup.
    pub snapshot_path: Option<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("POTLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
