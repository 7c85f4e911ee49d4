//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (handled by the caller, highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file never aborts startup: a warning is logged and the
//! compiled defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SHELF_CONFIG";
/// Environment variable overriding the database path
pub const DATABASE_ENV_VAR: &str = "SHELF_DATABASE";
/// Environment variable overriding the HTTP port
pub const PORT_ENV_VAR: &str = "SHELF_PORT";

const APP_DIR: &str = "shelf-aware";
const USER_AGENT: &str = "shelf-aware/0.1 (book-stats engine)";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Port for the read-only HTTP API
    #[serde(default = "default_port")]
    pub port: u16,

    /// User-Agent sent to the feed and the lookup source
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Reading-history feed settings
    #[serde(default)]
    pub feed: FeedSettings,

    /// Genre/page-count lookup settings
    #[serde(default)]
    pub enrichment: EnrichmentSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Paginated feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_feed_base_url")]
    pub base_url: String,
    /// Entries per page; a shorter page marks the last one
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Mandatory pause between page requests
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_feed_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_feed_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_feed_backoff_ms")]
    pub initial_backoff_ms: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: default_feed_base_url(),
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
            timeout_secs: default_feed_timeout_secs(),
            max_retries: default_feed_max_retries(),
            initial_backoff_ms: default_feed_backoff_ms(),
        }
    }
}

/// Secondary lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    #[serde(default = "default_enrichment_base_url")]
    pub base_url: String,
    /// Minimum spacing between lookups, shared by all workers
    #[serde(default = "default_enrichment_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_enrichment_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_enrichment_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_enrichment_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Concurrent lookup workers (1 = sequential)
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            base_url: default_enrichment_base_url(),
            delay_ms: default_enrichment_delay_ms(),
            timeout_secs: default_enrichment_timeout_secs(),
            max_retries: default_enrichment_max_retries(),
            initial_backoff_ms: default_enrichment_backoff_ms(),
            workers: default_workers(),
        }
    }
}

fn default_port() -> u16 {
    5730
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_feed_base_url() -> String {
    "https://www.goodreads.com".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_page_delay_ms() -> u64 {
    1000
}

fn default_feed_timeout_secs() -> u64 {
    15
}

fn default_feed_max_retries() -> u32 {
    3
}

fn default_feed_backoff_ms() -> u64 {
    500
}

fn default_enrichment_base_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_enrichment_delay_ms() -> u64 {
    500
}

fn default_enrichment_timeout_secs() -> u64 {
    5
}

fn default_enrichment_max_retries() -> u32 {
    2
}

fn default_enrichment_backoff_ms() -> u64 {
    250
}

fn default_workers() -> usize {
    1
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            port: default_port(),
            user_agent: default_user_agent(),
            logging: LoggingConfig::default(),
            feed: FeedSettings::default(),
            enrichment: EnrichmentSettings::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                path = %path.display(),
                "Config file not found, using built-in defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Resolve and load configuration, then apply environment overrides
    ///
    /// `cli_path` is the `--config` argument, if any.
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_file_path(cli_path) {
            Some(path) => Self::load(&path)?,
            None => {
                warn!("No config directory available, using built-in defaults");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SHELF_DATABASE` / `SHELF_PORT` on top of file values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
            if !path.trim().is_empty() {
                self.database_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(port) = std::env::var(PORT_ENV_VAR) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| {
                    Error::Config(format!("{} is not a valid port: {:?}", PORT_ENV_VAR, port))
                })?;
        }

        Ok(())
    }

    /// Reject settings that would break ingestion
    pub fn validate(&self) -> Result<()> {
        if self.feed.page_size == 0 {
            return Err(Error::Config("feed.page_size must be at least 1".to_string()));
        }
        if self.enrichment.workers == 0 {
            return Err(Error::Config("enrichment.workers must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Database path: CLI argument, then config/env value, then platform default
    pub fn database_path(&self, cli_arg: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_arg {
            return path.to_path_buf();
        }
        self.database_path
            .clone()
            .unwrap_or_else(default_database_path)
    }
}

/// Config file location: CLI argument, then `SHELF_CONFIG`, then the user config dir
pub fn config_file_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./shelf_data"))
        .join("shelf.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.port, 5730);
        assert_eq!(config.feed.page_size, 100);
        assert_eq!(config.feed.page_delay_ms, 1000);
        assert_eq!(config.enrichment.workers, 1);
        assert_eq!(config.logging.level, "info");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            port = 9000

            [enrichment]
            workers = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.enrichment.workers, 4);
        assert_eq!(config.enrichment.delay_ms, 500);
        assert_eq!(config.feed.base_url, "https://www.goodreads.com");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("port = \"not a number\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = TomlConfig::default();
        config.enrichment.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_database_path_wins() {
        let mut config = TomlConfig::default();
        config.database_path = Some(PathBuf::from("/from/toml.db"));

        let path = config.database_path(Some(Path::new("/from/cli.db")));
        assert_eq!(path, PathBuf::from("/from/cli.db"));
        assert_eq!(config.database_path(None), PathBuf::from("/from/toml.db"));
    }
}
