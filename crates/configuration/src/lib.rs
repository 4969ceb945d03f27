use crate::error::ConfigError;
use std::path::Path;
use tracing::level_filters::LevelFilter;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{CacheConfig, Config, Defaults, LoggingConfig, OutputFormat, ProviderConfig};

/// Default location of the configuration file, relative to the working directory.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix of environment overrides, e.g. `TICKERSCOPE__PROVIDER__TIMEOUT_SECS=10`.
pub const ENV_PREFIX: &str = "TICKERSCOPE";
/// Conventional variable holding the market-data API key.
pub const API_KEY_ENV: &str = "FMP_API_KEY";

/// Loads the application configuration from `config.toml` and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(CONFIG_FILE)
}

/// Loads the application configuration with an explicit file path.
///
/// Sources are layered lowest to highest: built-in defaults, the optional
/// TOML file, then `TICKERSCOPE__`-prefixed environment variables. When no
/// API key is configured by then, `FMP_API_KEY` is used. The merged result
/// is validated before it is returned.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // A missing file is fine; every section has defaults.
        .add_source(config::File::from(path.as_ref()).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config = builder.try_deserialize::<Config>()?;
    apply_api_key_fallback(&mut config, std::env::var(API_KEY_ENV).ok());
    validate(&config)?;

    Ok(config)
}

/// Fills in the API key from the conventional variable when none was configured.
fn apply_api_key_fallback(config: &mut Config, env_key: Option<String>) {
    let configured = config
        .provider
        .api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    if !configured {
        config.provider.api_key = env_key.filter(|key| !key.trim().is_empty());
    }
}

/// Rejects settings the rest of the application cannot work with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.provider.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "provider.base_url must not be empty".to_string(),
        ));
    }
    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "provider.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if config.defaults.lookback_days == 0 {
        return Err(ConfigError::ValidationError(
            "defaults.lookback_days must be greater than zero".to_string(),
        ));
    }
    if config.defaults.symbol.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "defaults.symbol must not be empty".to_string(),
        ));
    }
    if config.logging.level.parse::<LevelFilter>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "logging.level '{}' is not one of off, error, warn, info, debug, trace",
            config.logging.level
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
        assert_eq!(config.provider.user_agent, "Financial-Calendar-App/1.0");
        assert_eq!(config.defaults.format, OutputFormat::Table);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_age(), None);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.provider.base_url, ProviderConfig::default().base_url);
        assert_eq!(config.defaults.lookback_days, 90);
    }

    #[test]
    fn file_values_override_defaults_section_by_section() {
        let file = write_config(
            r#"
            [provider]
            api_key = "from-file"
            timeout_secs = 5

            [cache]
            max_age_minutes = 15

            [defaults]
            symbol = "MSFT"
            format = "json"
            "#,
        );
        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.provider.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.provider.timeout_secs, 5);
        // Untouched keys inside a present section keep their defaults.
        assert_eq!(config.provider.user_agent, "Financial-Calendar-App/1.0");
        assert_eq!(config.cache.max_age(), Some(chrono::Duration::minutes(15)));
        assert_eq!(config.defaults.symbol, "MSFT");
        assert_eq!(config.defaults.format, OutputFormat::Json);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write_config("[provider]\ntimeout_secs = 0\n");
        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::ValidationError(_))));

        let mut config = Config::default();
        config.defaults.lookback_days = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.provider.base_url = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn oversized_max_age_means_no_limit() {
        let file = write_config("[cache]\nmax_age_minutes = 200000000000000\n");
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.cache.max_age_minutes, Some(200_000_000_000_000));
        assert_eq!(config.cache.max_age(), None);

        let cache = CacheConfig {
            max_age_minutes: Some(u64::MAX),
            ..CacheConfig::default()
        };
        assert_eq!(cache.max_age(), None);
    }

    #[test]
    fn malformed_file_is_a_load_error() {
        let file = write_config("[provider\nbase_url = ");
        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn api_key_fallback_only_fills_a_missing_key() {
        let mut config = Config::default();
        apply_api_key_fallback(&mut config, Some("env-key".to_string()));
        assert_eq!(config.provider.api_key.as_deref(), Some("env-key"));

        let mut config = Config::default();
        config.provider.api_key = Some("configured".to_string());
        apply_api_key_fallback(&mut config, Some("env-key".to_string()));
        assert_eq!(config.provider.api_key.as_deref(), Some("configured"));

        let mut config = Config::default();
        config.provider.api_key = Some(String::new());
        apply_api_key_fallback(&mut config, Some("   ".to_string()));
        assert_eq!(config.provider.api_key, None);
    }
}
