use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Base URL of TheCocktailDB JSON API (override for mirrors or tests)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent to the upstream API
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Address the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Full-catalog sweep settings
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Configuration for the A-Z catalog sweep
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Letters queried concurrently per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause between batches in milliseconds
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            listen_addr: default_listen_addr(),
            catalog: CatalogConfig::default(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://www.thecocktaildb.com/api/json/v1/1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; CocktailFinder/0.1)".to_string()
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_batch_size() -> usize {
    5
}

fn default_batch_delay_ms() -> u64 {
    200
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with COCKTAIL__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: COCKTAIL__CATALOG__BATCH_SIZE
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Message("base_url must not be empty".to_string()));
        }
        if self.catalog.batch_size == 0 {
            return Err(ConfigError::Message(
                "catalog.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the source priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: COCKTAIL__CATALOG__BATCH_DELAY_MS
        .add_source(
            Environment::with_prefix("COCKTAIL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_default_values() {
        assert_eq!(
            default_base_url(),
            "https://www.thecocktaildb.com/api/json/v1/1"
        );
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_batch_size(), 5);
        assert_eq!(default_batch_delay_ms(), 200);
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.base_url, default_base_url());
        assert_eq!(config.listen_addr, "127.0.0.1:3000");
        assert_eq!(config.catalog.batch_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_from_toml() {
        let config = from_toml(
            r#"
            base_url = "http://localhost:9999/api"
            timeout = 5

            [catalog]
            batch_size = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:9999/api");
        assert_eq!(config.timeout, 5);
        assert_eq!(config.catalog.batch_size, 3);
        assert_eq!(config.catalog.batch_delay_ms, 200);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.catalog.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
