//! JSON decoding for saved backend responses.

use anyhow::{Context, Result};

use crate::models::{DailyAggregatesPage, RawAggregateRow, SummaryStats};

/// Decodes a `/api/aggregates/daily` response body.
///
/// A bare JSON array of rows is accepted too, so exported row dumps can be
/// replayed without the pagination wrapper.
pub fn parse_aggregates(bytes: &[u8]) -> Result<Vec<RawAggregateRow>> {
    if let Ok(page) = serde_json::from_slice::<DailyAggregatesPage>(bytes) {
        return Ok(page.data);
    }
    serde_json::from_slice::<Vec<RawAggregateRow>>(bytes)
        .context("expected a daily aggregates response or an array of aggregate rows")
}

/// Decodes a `/api/summary` response body.
pub fn parse_summary(bytes: &[u8]) -> Result<SummaryStats> {
    serde_json::from_slice(bytes).context("invalid summary response")
}
