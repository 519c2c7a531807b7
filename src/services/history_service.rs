use crate::history::{HistoryError, HistoryProvider};
use crate::models::PricePoint;

/// Sorts ascending by time and keeps only the first bar seen for each time.
///
/// The sort is stable, so "first" means first in the order the feed
/// delivered them.
pub fn sanitize_history(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.sort_by_key(|p| p.time);
    points.dedup_by_key(|p| p.time);
    points
}

/// Fetches a symbol's history and sanitizes it, ready for indicators.
pub async fn load_history(
    provider: &dyn HistoryProvider,
    symbol: &str,
) -> Result<Vec<PricePoint>, HistoryError> {
    let raw = provider.fetch_history(symbol).await?;
    let fetched = raw.len();
    let points = sanitize_history(raw);

    if points.len() < fetched {
        tracing::warn!(
            "Dropped {} duplicate bars from {} history for {}",
            fetched - points.len(),
            provider.name(),
            symbol
        );
    }

    Ok(points)
}
