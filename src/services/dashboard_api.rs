//! Trait and request type for the trip analytics backend.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::coordinator::state::Ticket;
use crate::error::ErrorKind;
use crate::models::{
    DailyAggregatesPage, DatasetStatistics, DateRangeFilter, SummaryStats, TripPage,
};

/// Everything a backend call needs, tagged with the ticket it answers.
#[derive(Clone, PartialEq, Serialize)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub filter: DateRangeFilter,
    pub page: u32,
    pub page_size: u32,
    #[serde(skip)]
    pub credential: String,
}

impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("ticket", &self.ticket)
            .field("filter", &self.filter)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("credential", &"<redacted>")
            .finish()
    }
}

/// Abstraction over the backend that serves summary, aggregate and trip data.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Totals and breakdowns for the filter's range.
    async fn fetch_summary(&self, req: &FetchRequest) -> Result<SummaryStats, ErrorKind>;

    /// One page of per-day, per-service aggregate rows.
    async fn fetch_daily_aggregates(
        &self,
        req: &FetchRequest,
    ) -> Result<DailyAggregatesPage, ErrorKind>;

    /// One page of raw trips.
    async fn fetch_trip_page(&self, req: &FetchRequest) -> Result<TripPage, ErrorKind>;

    /// Totals and data quality over the whole dataset. Takes no filter.
    async fn fetch_statistics(&self, credential: &str) -> Result<DatasetStatistics, ErrorKind>;
}
