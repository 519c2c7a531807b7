use serde::Serialize;
use thiserror::Error;

use crate::history::{HistoryError, HistoryProvider};
use crate::indicators::{
    align_overlay, IndicatorError, IndicatorKind, IndicatorRequest, MovingAverage, OverlayPoint,
};
use crate::models::{normalize_symbol, PricePoint};
use crate::services::history_service::load_history;
use crate::theme::{ChartPalette, ChartTheme};

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub key: String,
    pub kind: MovingAverage,
    pub period: usize,
    pub color: String,
    pub points: Vec<OverlayPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub symbol: String,
    pub theme: ChartTheme,
    pub palette: &'static ChartPalette,
    pub candles: Vec<PricePoint>,
    pub overlays: Vec<Overlay>,
}

/// Computes one overlay per request over already-sanitized points.
///
/// Each request gets its color from the palette's overlay cycle by position.
/// The first non-finite close fails the whole chart.
pub fn build_overlays(
    points: &[PricePoint],
    requests: &[IndicatorRequest],
    palette: &ChartPalette,
) -> Result<Vec<Overlay>, IndicatorError> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    requests
        .iter()
        .enumerate()
        .map(|(i, req)| -> Result<Overlay, IndicatorError> {
            let kind = IndicatorKind::new(req.kind, req.period, palette.overlay_color(i))?;
            let series = kind.compute_series(points)?;
            Ok(Overlay {
                key: kind.key(),
                kind: kind.moving_average(),
                period: kind.period(),
                color: kind.color_hint().to_string(),
                points: align_overlay(&series),
            })
        })
        .collect()
}

pub async fn build_chart(
    provider: &dyn HistoryProvider,
    symbol: &str,
    requests: &[IndicatorRequest],
    theme: ChartTheme,
) -> Result<ChartData, ChartError> {
    let symbol = normalize_symbol(symbol)?;
    let candles = load_history(provider, &symbol).await?;
    let palette = theme.palette();
    let overlays = build_overlays(&candles, requests, palette)?;

    tracing::debug!(
        "Built chart for {}: {} candles, {} overlays",
        symbol,
        candles.len(),
        overlays.len()
    );

    Ok(ChartData {
        symbol,
        theme,
        palette,
        candles,
        overlays,
    })
}
