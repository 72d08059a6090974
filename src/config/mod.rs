/*
 * Configuration management for the yield aggregation service
 */

use crate::aggregator::DexPolicy;
use crate::dex::ekubo;
use crate::lending::zklend::{self, LendingMarket};
use crate::models::{Result, TokenInfo, YieldError};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub ekubo: EkuboConfig,
    pub zklend: ZkLendConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EkuboConfig {
    pub api_url: String,
    pub quoter_url: String,
    pub reference_token: String,
    pub tokens: Vec<TokenInfo>,
    pub policy: DexPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZkLendConfig {
    pub api_url: String,
    pub markets: Vec<LendingMarket>,
}

impl HttpConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_concurrent_requests: 4,
        }
    }
}

impl Default for EkuboConfig {
    fn default() -> Self {
        Self {
            api_url: ekubo::DEFAULT_API_URL.to_string(),
            quoter_url: ekubo::DEFAULT_QUOTER_URL.to_string(),
            reference_token: ekubo::DEFAULT_REFERENCE_TOKEN.to_string(),
            tokens: ekubo::default_whitelist(),
            policy: DexPolicy::default(),
        }
    }
}

impl Default for ZkLendConfig {
    fn default() -> Self {
        Self {
            api_url: zklend::DEFAULT_API_URL.to_string(),
            markets: zklend::default_markets(),
        }
    }
}

impl Config {
    /// Loads `.env`, reads the environment, then layers `APR_CONFIG_FILE` on top if set.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = EkuboConfig::default();
        let config = Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_or("SERVER_PORT", 8080)?,
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env_or("LOG_FORMAT", LogFormat::Pretty)?,
            },
            http: HttpConfig {
                request_timeout_secs: env_or("HTTP_TIMEOUT_SECS", 10)?,
                max_concurrent_requests: env_or("MAX_CONCURRENT_REQUESTS", 4)?,
            },
            ekubo: EkuboConfig {
                api_url: env::var("EKUBO_API_URL").unwrap_or(defaults.api_url),
                quoter_url: env::var("EKUBO_QUOTER_URL").unwrap_or(defaults.quoter_url),
                reference_token: env::var("EKUBO_REFERENCE_TOKEN")
                    .unwrap_or(defaults.reference_token),
                tokens: defaults.tokens,
                policy: DexPolicy {
                    activity_filter: env_or("EKUBO_ACTIVITY_FILTER", defaults.policy.activity_filter)?,
                    sort_key: env_or("EKUBO_SORT_KEY", defaults.policy.sort_key)?,
                    min_apr: match env::var("EKUBO_MIN_APR") {
                        Ok(raw) => parse_min_apr(&raw)?,
                        Err(_) => defaults.policy.min_apr,
                    },
                    drop_zero_apr: env_or("EKUBO_DROP_ZERO_APR", defaults.policy.drop_zero_apr)?,
                    apr_model: env_or("EKUBO_APR_MODEL", defaults.policy.apr_model)?,
                },
            },
            zklend: ZkLendConfig {
                api_url: env::var("ZKLEND_API_URL")
                    .unwrap_or_else(|_| zklend::DEFAULT_API_URL.to_string()),
                markets: zklend::default_markets(),
            },
        };

        let config = match env::var("APR_CONFIG_FILE") {
            Ok(path) => config.with_file(&path)?,
            Err(_) => config,
        };
        config.validate()?;
        Ok(config)
    }

    /// Overlays a TOML/JSON/YAML file on this configuration. Keys present in the file win.
    pub fn with_file(self, path: &str) -> Result<Self> {
        let layered = ::config::Config::builder()
            .add_source(::config::Config::try_from(&self)?)
            .add_source(::config::File::with_name(path))
            .build()?;
        let config: Config = layered.try_deserialize()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.http.max_concurrent_requests == 0 {
            return Err(YieldError::ConfigError(
                "max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(YieldError::ConfigError(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                log_level: "info".to_string(),
                log_format: LogFormat::Pretty,
            },
            http: HttpConfig::default(),
            ekubo: EkuboConfig::default(),
            zklend: ZkLendConfig::default(),
        }
    }
}

impl FromStr for LogFormat {
    type Err = YieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(YieldError::ConfigError(format!("Unknown log format: {s}"))),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| YieldError::ConfigError(format!("Invalid {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

fn parse_min_apr(raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| YieldError::ConfigError(format!("Invalid EKUBO_MIN_APR: {e}")))
}
