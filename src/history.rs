use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{normalize_symbol, HistoricalPriceRow, PricePoint, Symbol};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid symbol {0:?}: expected letters and digits only")]
    InvalidSymbol(String),

    #[error("no price history found for {0}")]
    NotFound(Symbol),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("invalid row for {symbol} on {date}: {reason}")]
    InvalidRow {
        symbol: Symbol,
        date: NaiveDate,
        reason: String,
    },
}

/// Source of daily OHLCV history for a NEPSE symbol.
///
/// Implementations return rows in whatever order the backend produced them;
/// callers sanitize before computing anything on top.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn fetch_history(&self, symbol: &str) -> Result<Vec<PricePoint>, HistoryError>;

    /// Short label used in logs.
    fn name(&self) -> &str;
}

/// History loaded once from a JSON array of `historical_prices` rows.
#[derive(Debug, Clone, Default)]
pub struct FileHistory {
    by_symbol: HashMap<Symbol, Vec<PricePoint>>,
}

impl FileHistory {
    pub fn from_rows(rows: Vec<HistoricalPriceRow>) -> Result<Self, HistoryError> {
        let mut by_symbol: HashMap<Symbol, Vec<PricePoint>> = HashMap::new();
        for row in rows {
            let symbol = row.symbol.trim().to_uppercase();
            let point = PricePoint::try_from(row)?;
            by_symbol.entry(symbol).or_default().push(point);
        }
        Ok(Self { by_symbol })
    }

    pub fn from_json(json: &str) -> Result<Self, HistoryError> {
        let rows: Vec<HistoricalPriceRow> =
            serde_json::from_str(json).map_err(|e| HistoryError::ParseError(e.to_string()))?;
        Self::from_rows(rows)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            HistoryError::RequestFailed(format!("failed to read {}: {}", path.display(), e))
        })?;
        let history = Self::from_json(&json)?;
        tracing::info!(
            "Loaded history for {} symbols from {}",
            history.by_symbol.len(),
            path.display()
        );
        let mut symbols: Vec<&str> = history.symbols().collect();
        symbols.sort_unstable();
        tracing::debug!("File history symbols: {}", symbols.join(", "));
        Ok(history)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.by_symbol.keys().map(String::as_str)
    }
}

#[async_trait]
impl HistoryProvider for FileHistory {
    async fn fetch_history(&self, symbol: &str) -> Result<Vec<PricePoint>, HistoryError> {
        let symbol = normalize_symbol(symbol)?;
        match self.by_symbol.get(&symbol) {
            Some(points) if !points.is_empty() => Ok(points.clone()),
            _ => Err(HistoryError::NotFound(symbol)),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}
