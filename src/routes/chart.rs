use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{chart_error, error_response, history_error, ApiError};
use crate::indicators::IndicatorRequest;
use crate::models::normalize_symbol;
use crate::services::chart_service::{build_chart, ChartData};
use crate::state::AppState;
use crate::theme::ChartTheme;

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    /// Comma-separated: "sma_20,sma_50,ema_12"
    #[serde(default)]
    pub indicators: String,
    /// "light" or "dark"; falls back to the configured default
    #[serde(default)]
    pub theme: Option<String>,
}

pub async fn get_chart(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartData>, ApiError> {
    let symbol = normalize_symbol(&symbol).map_err(history_error)?;

    let theme = match query.theme.as_deref() {
        Some(raw) => raw.parse::<ChartTheme>().map_err(|e| {
            tracing::warn!("Rejected chart request for {}: {}", symbol, e);
            error_response(StatusCode::BAD_REQUEST, e)
        })?,
        None => state.limits.default_theme,
    };

    let requests = IndicatorRequest::parse_list(
        &query.indicators,
        state.limits.max_indicator_period,
        state.limits.max_indicators,
    )
    .map_err(|e| {
        tracing::warn!("Rejected chart request for {}: {}", symbol, e);
        error_response(StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let chart = build_chart(state.history.as_ref(), &symbol, &requests, theme)
        .await
        .map_err(chart_error)?;

    Ok(Json(chart))
}
