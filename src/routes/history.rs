use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{history_error, ApiError};
use crate::models::{normalize_symbol, PricePoint};
use crate::services::history_service::load_history;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HistoryResponse {
    pub symbol: String,
    pub candles: Vec<PricePoint>,
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let symbol = normalize_symbol(&symbol).map_err(history_error)?;
    let candles = load_history(state.history.as_ref(), &symbol)
        .await
        .map_err(history_error)?;

    Ok(Json(HistoryResponse { symbol, candles }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::FileHistory;
    use crate::state::ChartLimits;
    use axum::http::StatusCode;
    use std::sync::Arc;

    fn state() -> AppState {
        let history = FileHistory::from_json(
            r#"[
                {"symbol": "NICA", "date": "2026-01-02",
                 "open": 2, "high": 2, "low": 2, "close": 2, "volume": 10},
                {"symbol": "NICA", "date": "2026-01-01",
                 "open": 1, "high": 1, "low": 1, "close": 1, "volume": 20}
            ]"#,
        )
        .unwrap();
        AppState::new(Arc::new(history), ChartLimits::default())
    }

    #[tokio::test]
    async fn test_get_history_sorted() {
        let Json(body) = get_history(State(state()), Path("nica".to_string()))
            .await
            .unwrap();

        assert_eq!(body.symbol, "NICA");
        let closes: Vec<f64> = body.candles.iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn test_get_history_not_found() {
        let (status, _) = get_history(State(state()), Path("HRL".to_string()))
            .await
            .err()
            .unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_history_rejects_malformed_symbol() {
        let (status, body) = get_history(State(state()), Path("nica&limit=1".to_string()))
            .await
            .err()
            .unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.0.error.contains("invalid symbol"));
    }
}
