// Technical indicator engine
// Pure moving-average computations over closing prices, plus the overlay
// alignment the chart consumes.

pub mod moving_averages;
pub mod overlay;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::models::{ChartTime, PricePoint};

pub use moving_averages::{EMA, SMA};
pub use overlay::{align_overlay, OverlayPoint};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("period must be a positive integer, got {0}")]
    InvalidPeriod(usize),

    #[error("period {period} exceeds the maximum of {max}")]
    PeriodTooLarge { period: usize, max: usize },

    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("malformed indicator spec {0:?}, expected <kind>_<period> such as sma_20")]
    MalformedSpec(String),

    #[error("too many indicators requested: {requested} (max {max})")]
    TooManyIndicators { requested: usize, max: usize },

    #[error("close at index {index} is not finite ({value})")]
    NonFiniteClose { index: usize, value: f64 },

    #[error("series has {series} values but there are {points} price points")]
    LengthMismatch { series: usize, points: usize },
}

/// Moving-average family supported on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MovingAverage {
    Sma,
    Ema,
}

impl MovingAverage {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovingAverage::Sma => "sma",
            MovingAverage::Ema => "ema",
        }
    }
}

impl FromStr for MovingAverage {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sma" => Ok(MovingAverage::Sma),
            "ema" => Ok(MovingAverage::Ema),
            _ => Err(IndicatorError::UnknownIndicator(s.to_string())),
        }
    }
}

/// A requested overlay: which average, over how many bars, and the color the
/// chart should draw it in. The color never affects the computed values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    SMA { period: usize, color_hint: String },
    EMA { period: usize, color_hint: String },
}

impl IndicatorKind {
    pub fn new(
        kind: MovingAverage,
        period: usize,
        color_hint: impl Into<String>,
    ) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidPeriod(period));
        }
        let color_hint = color_hint.into();
        Ok(match kind {
            MovingAverage::Sma => IndicatorKind::SMA { period, color_hint },
            MovingAverage::Ema => IndicatorKind::EMA { period, color_hint },
        })
    }

    pub fn moving_average(&self) -> MovingAverage {
        match self {
            IndicatorKind::SMA { .. } => MovingAverage::Sma,
            IndicatorKind::EMA { .. } => MovingAverage::Ema,
        }
    }

    pub fn period(&self) -> usize {
        match self {
            IndicatorKind::SMA { period, .. } | IndicatorKind::EMA { period, .. } => *period,
        }
    }

    pub fn color_hint(&self) -> &str {
        match self {
            IndicatorKind::SMA { color_hint, .. } | IndicatorKind::EMA { color_hint, .. } => {
                color_hint.as_str()
            }
        }
    }

    /// Stable key such as `sma_20`, matching the request grammar.
    pub fn key(&self) -> String {
        format!("{}_{}", self.moving_average().as_str(), self.period())
    }

    /// Raw values for `closes`, one entry per close, `None` during warm-up.
    pub fn compute(&self, closes: &[f64]) -> Result<Vec<Option<f64>>, IndicatorError> {
        match self {
            IndicatorKind::SMA { period, .. } => Ok(SMA::new(*period)?.calculate(closes)),
            IndicatorKind::EMA { period, .. } => Ok(EMA::new(*period)?.calculate(closes)),
        }
    }

    /// Computes the indicator over the close of each point, rejecting
    /// non-finite closes up front.
    pub fn compute_series(&self, points: &[PricePoint]) -> Result<IndicatorSeries, IndicatorError> {
        let closes = extract_closes(points)?;
        let values = self.compute(&closes)?;
        IndicatorSeries::from_values(points, values)
    }
}

/// Parsed `<kind>_<period>` request token, before a color is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorRequest {
    pub kind: MovingAverage,
    pub period: usize,
}

impl IndicatorRequest {
    pub fn parse(token: &str, max_period: usize) -> Result<Self, IndicatorError> {
        let token = token.trim();
        let (kind, period) = token
            .split_once('_')
            .ok_or_else(|| IndicatorError::MalformedSpec(token.to_string()))?;

        let kind: MovingAverage = kind.parse()?;
        let period: usize = period
            .parse()
            .map_err(|_| IndicatorError::MalformedSpec(token.to_string()))?;

        if period == 0 {
            return Err(IndicatorError::InvalidPeriod(period));
        }
        if period > max_period {
            return Err(IndicatorError::PeriodTooLarge { period, max: max_period });
        }

        Ok(Self { kind, period })
    }

    /// Parses a comma-separated list like `sma_20,ema_12`. Blank input yields
    /// no requests; repeated tokens collapse onto their first occurrence.
    pub fn parse_list(
        input: &str,
        max_period: usize,
        max_count: usize,
    ) -> Result<Vec<Self>, IndicatorError> {
        let mut requests: Vec<Self> = Vec::new();

        for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let request = Self::parse(token, max_period)?;
            if !requests.contains(&request) {
                requests.push(request);
            }
        }

        if requests.len() > max_count {
            return Err(IndicatorError::TooManyIndicators {
                requested: requests.len(),
                max: max_count,
            });
        }

        Ok(requests)
    }
}

impl fmt::Display for IndicatorRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.as_str(), self.period)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorPoint {
    pub time: ChartTime,
    pub value: Option<f64>,
}

/// Indicator values aligned 1:1 by position with the source price points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorSeries {
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn from_values(
        points: &[PricePoint],
        values: Vec<Option<f64>>,
    ) -> Result<Self, IndicatorError> {
        if points.len() != values.len() {
            return Err(IndicatorError::LengthMismatch {
                series: values.len(),
                points: points.len(),
            });
        }

        let points = points
            .iter()
            .zip(values)
            .map(|(p, value)| IndicatorPoint { time: p.time, value })
            .collect();

        Ok(Self { points })
    }
}

/// Close of every point, failing on the first NaN or infinity.
pub fn extract_closes(points: &[PricePoint]) -> Result<Vec<f64>, IndicatorError> {
    points
        .iter()
        .enumerate()
        .map(|(index, p)| {
            if p.close.is_finite() {
                Ok(p.close)
            } else {
                Err(IndicatorError::NonFiniteClose { index, value: p.close })
            }
        })
        .collect()
}
