use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};

use crate::history::{HistoryError, HistoryProvider};
use crate::models::{normalize_symbol, HistoricalPriceRow, PricePoint};

/// REST client for the hosted database that serves `historical_prices`.
pub struct HistoryClient {
    client: reqwest::Client,
    base_url: String,
    table_path: String,
}

impl HistoryClient {
    pub fn new(
        base_url: &str,
        table_path: &str,
        anon_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, HistoryError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = anon_key {
            let apikey = HeaderValue::from_str(key)
                .map_err(|e| HistoryError::RequestFailed(format!("invalid anon key: {}", e)))?;
            let bearer = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| HistoryError::RequestFailed(format!("invalid anon key: {}", e)))?;
            headers.insert("apikey", apikey);
            headers.insert(AUTHORIZATION, bearer);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent("sharesathi-charts/0.1")
            .build()
            .map_err(|e| HistoryError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            table_path: format!("/{}", table_path.trim_matches('/')),
        })
    }

    /// Rows for one symbol, oldest first. Query values are form-encoded.
    pub fn history_request(&self, symbol: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, self.table_path))
            .query(&[
                ("symbol", format!("eq.{}", symbol)),
                ("order", "date.asc".to_string()),
            ])
    }

    /// Maps an upstream status and body to points; an empty result is `NotFound`.
    pub fn decode_response(
        status: StatusCode,
        body: &str,
        symbol: &str,
    ) -> Result<Vec<PricePoint>, HistoryError> {
        if !status.is_success() {
            return Err(HistoryError::RequestFailed(format!(
                "upstream returned {} for {}",
                status, symbol
            )));
        }

        let points = Self::parse_rows(body)?;
        if points.is_empty() {
            return Err(HistoryError::NotFound(symbol.to_string()));
        }
        Ok(points)
    }

    pub fn parse_rows(body: &str) -> Result<Vec<PricePoint>, HistoryError> {
        let rows: Vec<HistoricalPriceRow> = serde_json::from_str(body).map_err(|e| {
            HistoryError::ParseError(format!("failed to parse history rows: {}", e))
        })?;

        rows.into_iter().map(PricePoint::try_from).collect()
    }
}

#[async_trait]
impl HistoryProvider for HistoryClient {
    async fn fetch_history(&self, symbol: &str) -> Result<Vec<PricePoint>, HistoryError> {
        let symbol = normalize_symbol(symbol)?;
        tracing::debug!("Fetching history for {} from {}", symbol, self.base_url);

        let response = self
            .history_request(&symbol)
            .send()
            .await
            .map_err(|e| HistoryError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            HistoryError::ParseError(format!("failed to read response body: {}", e))
        })?;

        let points = Self::decode_response(status, &body, &symbol)?;
        tracing::info!("Fetched {} history rows for {}", points.len(), symbol);
        Ok(points)
    }

    fn name(&self) -> &str {
        "remote"
    }
}
