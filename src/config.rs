use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::theme::ChartTheme;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_API_PREFIX: &str = "/api/v1";
const DEFAULT_TABLE_PATH: &str = "/api/database/records/historical_prices";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_PERIOD: usize = 200;
const DEFAULT_MAX_INDICATORS: usize = 8;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("no history source configured: set HISTORY_SOURCE_URL or HISTORY_FILE")]
    MissingHistorySource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistorySourceConfig {
    Remote {
        base_url: String,
        table_path: String,
        anon_key: Option<String>,
        timeout: Duration,
    },
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub api_prefix: String,
    pub history_source: HistorySourceConfig,
    pub default_theme: ChartTheme,
    pub max_indicator_period: usize,
    pub max_indicators: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or(&get, "BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let default_theme = parse_or(&get, "CHART_THEME", "dark")?;
        let max_indicator_period: usize =
            parse_or(&get, "MAX_INDICATOR_PERIOD", &DEFAULT_MAX_PERIOD.to_string())?;
        let max_indicators: usize =
            parse_or(&get, "MAX_INDICATORS", &DEFAULT_MAX_INDICATORS.to_string())?;
        let timeout_secs: u64 =
            parse_or(&get, "HISTORY_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())?;

        if max_indicator_period == 0 {
            return Err(invalid("MAX_INDICATOR_PERIOD", "0", "must be at least 1"));
        }
        if max_indicators == 0 {
            return Err(invalid("MAX_INDICATORS", "0", "must be at least 1"));
        }

        let api_prefix = get("API_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
        let api_prefix = normalize_prefix(&api_prefix);

        let history_source = match (get("HISTORY_SOURCE_URL"), get("HISTORY_FILE")) {
            (Some(base_url), _) => {
                if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                    return Err(invalid("HISTORY_SOURCE_URL", &base_url, "must be an http(s) URL"));
                }
                HistorySourceConfig::Remote {
                    base_url,
                    table_path: get("HISTORY_TABLE_PATH")
                        .unwrap_or_else(|| DEFAULT_TABLE_PATH.to_string()),
                    anon_key: get("HISTORY_ANON_KEY"),
                    timeout: Duration::from_secs(timeout_secs),
                }
            }
            (None, Some(path)) => HistorySourceConfig::File(PathBuf::from(path)),
            (None, None) => return Err(ConfigError::MissingHistorySource),
        };

        Ok(Self {
            bind_addr,
            api_prefix,
            history_source,
            default_theme,
            max_indicator_period,
            max_indicators,
        })
    }
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    let raw = get(key).unwrap_or_else(|| default.to_string());
    raw.trim().parse::<T>().map_err(|e| invalid(key, &raw, e.to_string()))
}

// "/api/v1/" and "api/v1" both become "/api/v1"; "/" becomes "".
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
