use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub defaults: Defaults,
}

/// Connection settings for the market-data provider.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Root URL of the provider. A path prefix (e.g. a proxy mount) is kept
    /// in front of every endpoint path.
    pub base_url: String,
    /// Falls back to the `FMP_API_KEY` environment variable when unset.
    pub api_key: Option<String>,
    pub user_agent: String,
    /// Whole-request timeout for every provider call.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://financialmodelingprep.com".to_string(),
            api_key: None,
            user_agent: "Financial-Calendar-App/1.0".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Settings for the local snapshot cache.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// JSON file holding every cached snapshot.
    pub path: PathBuf,
    /// Entries older than this are refetched. `None` keeps them until the query changes.
    pub max_age_minutes: Option<u64>,
}

impl CacheConfig {
    /// The configured age limit. A limit too large for `chrono::Duration`
    /// is no limit at all.
    pub fn max_age(&self) -> Option<chrono::Duration> {
        self.max_age_minutes
            .and_then(|minutes| i64::try_from(minutes).ok())
            .and_then(chrono::Duration::try_minutes)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(".tickerscope/cache.json"),
            max_age_minutes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set, e.g. "info".
    pub level: String,
    /// Directory for the daily-rolling log files.
    pub directory: PathBuf,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: PathBuf::from("logs"),
            file_prefix: "tickerscope.log".to_string(),
        }
    }
}

/// Values the CLI uses when a flag is omitted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    pub symbol: String,
    /// Calendar days ending today that a report covers by default.
    pub lookback_days: u32,
    pub format: OutputFormat,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            lookback_days: 90,
            format: OutputFormat::Table,
        }
    }
}

/// How the CLI prints a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
