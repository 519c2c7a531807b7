pub mod chart;
pub mod history;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::history::HistoryError;
use crate::services::chart_service::ChartError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: error.into() }))
}

pub(crate) fn history_error(err: HistoryError) -> ApiError {
    let status = match err {
        HistoryError::InvalidSymbol(_) => {
            tracing::warn!("Rejected request: {}", err);
            StatusCode::BAD_REQUEST
        }
        HistoryError::NotFound(_) => {
            tracing::warn!("Rejected request: {}", err);
            StatusCode::NOT_FOUND
        }
        HistoryError::RequestFailed(_)
        | HistoryError::ParseError(_)
        | HistoryError::InvalidRow { .. } => {
            tracing::error!("History source failed: {}", err);
            StatusCode::BAD_GATEWAY
        }
    };
    error_response(status, err.to_string())
}

pub(crate) fn chart_error(err: ChartError) -> ApiError {
    match err {
        ChartError::History(e) => history_error(e),
        ChartError::Indicator(e) => {
            tracing::warn!("Rejected chart request: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "ShareSathi chart service",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router(state: AppState, prefix: &str) -> Router {
    let api_routes = Router::new()
        .route("/stocks/:symbol/history", get(history::get_history))
        .route("/stocks/:symbol/chart", get(chart::get_chart));

    let app = Router::new().route("/", get(root));
    let app = if prefix.is_empty() {
        app.merge(api_routes)
    } else {
        app.nest(prefix, api_routes)
    };

    app.layer(CorsLayer::permissive()).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::FileHistory;
    use crate::state::ChartLimits;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let rows: Vec<serde_json::Value> = (0..5)
            .map(|i| {
                let close = 500.0 + i as f64;
                serde_json::json!({
                    "symbol": "NABIL",
                    "date": (start + chrono::Duration::days(i)).to_string(),
                    "open": close,
                    "high": close,
                    "low": close,
                    "close": close
                })
            })
            .collect();
        let history = FileHistory::from_json(&serde_json::to_string(&rows).unwrap()).unwrap();
        AppState::new(Arc::new(history), ChartLimits::default())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_router_with_prefix() {
        let app = router(state(), "/api/v1");

        let (status, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

        let (status, body) = get(app.clone(), "/api/v1/stocks/nabil/history").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "NABIL");
        assert_eq!(body["candles"].as_array().unwrap().len(), 5);

        let (status, body) = get(app.clone(), "/api/v1/stocks/nabil/chart?indicators=sma_2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overlays"][0]["key"], "sma_2");
        assert_eq!(body["overlays"][0]["points"].as_array().unwrap().len(), 4);

        let (status, _) = get(app, "/stocks/NABIL/history").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_router_without_prefix() {
        let app = router(state(), "");

        let (status, _) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(app.clone(), "/stocks/NABIL/history").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "NABIL");

        let (status, body) = get(app, "/stocks/NABIL/chart?indicators=ema_3&theme=light").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "light");
    }

    #[tokio::test]
    async fn test_router_error_statuses() {
        let app = router(state(), "/api/v1");

        let (status, body) = get(app.clone(), "/api/v1/stocks/KBL/history").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "no price history found for KBL");

        let (status, body) = get(app.clone(), "/api/v1/stocks/nabil%26limit%3D1/history").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid symbol"));

        let (status, _) = get(app.clone(), "/api/v1/stocks/nabil%23x/chart").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(app, "/api/v1/stocks/NABIL/chart?indicators=sma_0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_history_error_status() {
        let (status, body) = history_error(HistoryError::NotFound("NABIL".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.0.error, "no price history found for NABIL");

        let (status, _) = history_error(HistoryError::RequestFailed("timeout".to_string()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _) = history_error(HistoryError::InvalidRow {
            symbol: "NABIL".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            reason: "volume must be a non-negative number, got -1".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _) = history_error(HistoryError::InvalidSymbol("NA BIL".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_chart_error_status() {
        let (status, _) = chart_error(ChartError::Indicator(
            crate::indicators::IndicatorError::InvalidPeriod(0),
        ));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_root() {
        let Json(body) = root().await;
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }
}
