use serde::Serialize;

use super::IndicatorSeries;
use crate::models::ChartTime;

/// A drawable overlay sample. Only produced for bars that have a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub time: ChartTime,
    pub value: f64,
}

/// Drops warm-up entries so the chart never receives placeholder values that
/// would stretch its price scale. Relative order is preserved.
pub fn align_overlay(series: &IndicatorSeries) -> Vec<OverlayPoint> {
    series
        .points
        .iter()
        .filter_map(|p| p.value.map(|value| OverlayPoint { time: p.time, value }))
        .collect()
}
