use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::history::HistoryError;

pub type Symbol = String;

/// Trims and upper-cases a ticker. NEPSE tickers are ASCII letters and digits;
/// anything else is rejected before it reaches a history source.
pub fn normalize_symbol(raw: &str) -> Result<Symbol, HistoryError> {
    let symbol = raw.trim().to_ascii_uppercase();
    if symbol.is_empty() || !symbol.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(HistoryError::InvalidSymbol(raw.to_string()));
    }
    Ok(symbol)
}

/// Horizontal position of a bar on the chart: a trading date, or an ordinal
/// index for feeds that carry no calendar information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartTime {
    Date(NaiveDate),
    Ordinal(u64),
}

/// One trading-session OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: ChartTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

/// Row of the upstream `historical_prices` table.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalPriceRow {
    pub symbol: String,
    pub date: NaiveDate,
    #[serde(deserialize_with = "number_or_string")]
    pub open: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub high: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub low: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub close: f64,
    #[serde(default, deserialize_with = "optional_number_or_string")]
    pub volume: Option<f64>,
}

impl TryFrom<HistoricalPriceRow> for PricePoint {
    type Error = HistoryError;

    fn try_from(row: HistoricalPriceRow) -> Result<Self, Self::Error> {
        let prices = [
            ("open", row.open),
            ("high", row.high),
            ("low", row.low),
            ("close", row.close),
        ];
        if let Some((field, value)) = prices.iter().find(|(_, v)| !v.is_finite()) {
            return Err(HistoryError::InvalidRow {
                symbol: row.symbol,
                date: row.date,
                reason: format!("{} is not finite ({})", field, value),
            });
        }

        if let Some(volume) = row.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(HistoryError::InvalidRow {
                    symbol: row.symbol,
                    date: row.date,
                    reason: format!("volume must be a non-negative number, got {}", volume),
                });
            }
        }

        Ok(PricePoint {
            time: ChartTime::Date(row.date),
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        })
    }
}

// Numeric(10, 2) columns arrive as JSON strings from some backends.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| E::custom(format!("invalid number {:?}: {}", s, e))),
        }
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_f64()
}

fn optional_number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_f64)
        .transpose()
}
