use std::sync::Arc;

use crate::api_client::HistoryClient;
use crate::config::{Config, HistorySourceConfig};
use crate::history::{FileHistory, HistoryError, HistoryProvider};
use crate::theme::ChartTheme;

/// Request limits and defaults the chart routes enforce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLimits {
    pub max_indicator_period: usize,
    pub max_indicators: usize,
    pub default_theme: ChartTheme,
}

impl From<&Config> for ChartLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_indicator_period: config.max_indicator_period,
            max_indicators: config.max_indicators,
            default_theme: config.default_theme,
        }
    }
}

impl Default for ChartLimits {
    fn default() -> Self {
        Self {
            max_indicator_period: 200,
            max_indicators: 8,
            default_theme: ChartTheme::Dark,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub history: Arc<dyn HistoryProvider>,
    pub limits: ChartLimits,
}

impl AppState {
    pub fn new(history: Arc<dyn HistoryProvider>, limits: ChartLimits) -> Self {
        Self { history, limits }
    }

    pub fn from_config(config: &Config) -> Result<Self, HistoryError> {
        let history: Arc<dyn HistoryProvider> = match &config.history_source {
            HistorySourceConfig::Remote {
                base_url,
                table_path,
                anon_key,
                timeout,
            } => Arc::new(HistoryClient::new(
                base_url,
                table_path,
                anon_key.as_deref(),
                *timeout,
            )?),
            HistorySourceConfig::File(path) => Arc::new(FileHistory::load(path)?),
        };

        tracing::info!("Using {} history source", history.name());
        Ok(Self::new(history, ChartLimits::from(config)))
    }
}
