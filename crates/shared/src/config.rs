//! Application configuration management.
//!
//! Layers, lowest priority first: `config/default`, `config/{RUN_MODE}`, then
//! `HORNERO__SECTION__KEY` environment variables.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Document store configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Spreadsheet mirror configuration.
    #[serde(default)]
    pub sheets: SheetsConfig,
    /// Exchange-rate source configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Business settings.
    #[serde(default)]
    pub business: BusinessConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB connection string.
    #[serde(default = "default_database_uri")]
    pub uri: String,
    /// Database name.
    #[serde(default = "default_database_name")]
    pub name: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
}

fn default_database_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database_name() -> String {
    "panaderia".to_string()
}

fn default_max_pool_size() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: default_database_uri(),
            name: default_database_name(),
            max_pool_size: default_max_pool_size(),
        }
    }
}

/// Google Sheets configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Spreadsheet document id.
    #[serde(default)]
    pub spreadsheet_id: String,
    /// Fixed OAuth bearer token. Takes precedence over `credentials_file`.
    #[serde(default)]
    pub access_token: String,
    /// Path to a service-account key file used to mint bearer tokens.
    #[serde(default)]
    pub credentials_file: String,
    /// API base url.
    #[serde(default = "default_sheets_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            access_token: String::new(),
            credentials_file: String::new(),
            base_url: default_sheets_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Exchange-rate source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Base url of the BCV rates API.
    #[serde(default = "default_rates_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_rates_base_url() -> String {
    "https://bcv-api.rafnixg.dev".to_string()
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_url: default_rates_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Business settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    /// IANA time zone that defines "today".
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "America/Caracas".to_string()
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HORNERO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
