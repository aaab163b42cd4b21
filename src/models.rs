//! Wire data model shared with the trip analytics backend.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Service type codes the backend knows about.
pub const KNOWN_SERVICE_TYPES: [&str; 4] = ["yellow", "green", "fhv", "fhvhv"];

/// Normalizes a service type code: trimmed and lower-cased.
pub fn canonical_service_type(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Human-facing service type name, e.g. `"fhvhv"` becomes `"Fhvhv"`.
pub fn service_display_name(raw: &str) -> String {
    let canonical = canonical_service_type(raw);
    let mut chars = canonical.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One row of `agg_daily_metrics`: a (date, service type) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAggregateRow {
    #[serde(rename = "metric_date")]
    pub date: NaiveDate,
    pub service_type: String,
    #[serde(rename = "total_trips")]
    pub trip_count: u64,
    #[serde(rename = "total_revenue")]
    pub revenue: f64,

    // nullable upstream
    #[serde(rename = "avg_trip_distance", default)]
    pub avg_distance: Option<f64>,
    #[serde(rename = "avg_trip_duration_sec", default)]
    pub avg_duration_seconds: Option<f64>,
    #[serde(rename = "avg_fare_amount", default)]
    pub avg_fare: Option<f64>,
}

impl RawAggregateRow {
    pub fn new(date: NaiveDate, service_type: &str, trip_count: u64, revenue: f64) -> Self {
        Self {
            date,
            service_type: service_type.to_string(),
            trip_count,
            revenue,
            avg_distance: None,
            avg_duration_seconds: None,
            avg_fare: None,
        }
    }

    pub fn with_averages(mut self, distance: f64, duration_seconds: f64, fare: f64) -> Self {
        self.avg_distance = Some(distance);
        self.avg_duration_seconds = Some(duration_seconds);
        self.avg_fare = Some(fare);
        self
    }
}

/// Pagination block returned with every paged response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_records: u64,
    pub total_pages: u32,
}

/// Response of `/api/aggregates/daily`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyAggregatesPage {
    pub data: Vec<RawAggregateRow>,
    pub pagination: Pagination,
}

/// A single trip in the raw table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip_id: i64,
    pub service_type: String,
    pub pickup_datetime: NaiveDateTime,
    pub dropoff_datetime: NaiveDateTime,
    #[serde(default)]
    pub pickup_borough: Option<String>,
    #[serde(default)]
    pub pickup_zone: Option<String>,
    #[serde(default)]
    pub dropoff_borough: Option<String>,
    #[serde(default)]
    pub dropoff_zone: Option<String>,
    #[serde(default)]
    pub trip_distance: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub trip_duration_sec: Option<i64>,
}

/// Response of `/api/trips`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TripPage {
    pub data: Vec<TripRecord>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTypeTotal {
    pub service_type: String,
    pub total_trips: u64,
    #[serde(default)]
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoroughTotal {
    pub pickup_borough: String,
    pub trip_count: u64,
    #[serde(default)]
    pub avg_distance: Option<f64>,
}

/// Backend-computed totals for the summary cards and distribution charts.
///
/// These are authoritative: nothing in this crate recomputes them from
/// aggregate rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_trips: u64,
    pub total_revenue: f64,
    pub avg_distance: f64,
    pub avg_duration_minutes: f64,
    pub avg_fare: f64,
    #[serde(default)]
    pub by_service_type: Vec<ServiceTypeTotal>,
    #[serde(default)]
    pub by_borough: Vec<BoroughTotal>,
}

impl SummaryStats {
    pub fn is_empty(&self) -> bool {
        self.total_trips == 0 && self.by_service_type.is_empty()
    }
}

/// Per-service row counts and validity from `/api/statistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTypeQuality {
    pub service_type: String,
    pub total_trips: u64,
    pub valid_trips: u64,
    /// Share of valid trips, 0 to 100.
    pub data_quality_pct: f64,
    #[serde(default)]
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Whole-dataset totals, independent of any filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub total_trips: u64,
    pub total_revenue: f64,
    pub date_range: DataDateRange,
    #[serde(default)]
    pub by_service_type: Vec<ServiceTypeQuality>,
}

impl DatasetStatistics {
    /// Valid trips over all trips across service types, as a percentage.
    pub fn overall_quality_pct(&self) -> Option<f64> {
        let (valid, total) = self
            .by_service_type
            .iter()
            .fold((0u64, 0u64), |(v, t), s| (v + s.valid_trips, t + s.total_trips));
        (total > 0).then(|| valid as f64 / total as f64 * 100.0)
    }
}

/// Inclusive date range plus optional narrowing filters.
///
/// Replaced wholesale whenever the user edits the filter form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRangeFilter {
    start: NaiveDate,
    end: NaiveDate,
    service_type: Option<String>,
    borough: Option<String>,
}

impl DateRangeFilter {
    /// Builds a filter, rejecting `start > end`. A blank service type means "all".
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        service_type: Option<&str>,
    ) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }

        let service_type = service_type
            .map(canonical_service_type)
            .filter(|s| !s.is_empty());

        Ok(Self {
            start,
            end,
            service_type,
            borough: None,
        })
    }

    /// Narrows the trip table to a pickup borough. Summary and chart ignore it.
    pub fn with_borough(mut self, borough: &str) -> Self {
        let borough = borough.trim();
        self.borough = (!borough.is_empty()).then(|| borough.to_string());
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn service_type(&self) -> Option<&str> {
        self.service_type.as_deref()
    }

    pub fn borough(&self) -> Option<&str> {
        self.borough.as_deref()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filter_rejects_inverted_range() {
        let result = DateRangeFilter::new(date(2020, 6, 1), date(2020, 5, 1), None);
        assert!(matches!(result, Err(DashboardError::InvalidRange { .. })));
    }

    #[test]
    fn test_filter_single_day_is_valid() {
        let filter = DateRangeFilter::new(date(2020, 5, 1), date(2020, 5, 1), None).unwrap();
        assert_eq!(filter.span_days(), 0);
        assert!(filter.contains(date(2020, 5, 1)));
    }

    #[test]
    fn test_filter_blank_service_type_means_all() {
        let filter = DateRangeFilter::new(date(2020, 5, 1), date(2020, 5, 31), Some("  ")).unwrap();
        assert_eq!(filter.service_type(), None);

        let filter =
            DateRangeFilter::new(date(2020, 5, 1), date(2020, 5, 31), Some(" Yellow ")).unwrap();
        assert_eq!(filter.service_type(), Some("yellow"));
    }

    #[test]
    fn test_filter_borough() {
        let filter = DateRangeFilter::new(date(2020, 5, 1), date(2020, 5, 31), None)
            .unwrap()
            .with_borough("Queens");
        assert_eq!(filter.borough(), Some("Queens"));
    }

    #[test]
    fn test_service_display_name() {
        assert_eq!(service_display_name("yellow"), "Yellow");
        assert_eq!(service_display_name("FHVHV"), "Fhvhv");
        assert_eq!(service_display_name(""), "");
    }

    #[test]
    fn test_aggregate_row_deserializes_nullable_averages() {
        let json = r#"{
            "metric_date": "2020-05-01",
            "service_type": "green",
            "total_trips": 42,
            "total_revenue": 512.75,
            "avg_trip_distance": null,
            "avg_trip_duration_sec": 600.0
        }"#;
        let row: RawAggregateRow = serde_json::from_str(json).unwrap();

        assert_eq!(row.date, date(2020, 5, 1));
        assert_eq!(row.trip_count, 42);
        assert_eq!(row.avg_distance, None);
        assert_eq!(row.avg_duration_seconds, Some(600.0));
        assert_eq!(row.avg_fare, None);
    }

    #[test]
    fn test_dataset_statistics_deserializes() {
        let json = r#"{
            "total_trips": 950,
            "total_revenue": 14250.5,
            "date_range": {"start": "2020-01-01", "end": "2020-12-31"},
            "by_service_type": [
                {"service_type": "green", "total_trips": 200, "valid_trips": 150,
                 "data_quality_pct": 75.0, "total_revenue": 2000.0},
                {"service_type": "yellow", "total_trips": 800, "valid_trips": 800,
                 "data_quality_pct": 100.0, "total_revenue": 12250.5}
            ]
        }"#;
        let stats: DatasetStatistics = serde_json::from_str(json).unwrap();

        assert_eq!(stats.date_range.end, date(2020, 12, 31));
        assert_eq!(stats.by_service_type[0].valid_trips, 150);
        assert_eq!(stats.overall_quality_pct(), Some(95.0));
    }

    #[test]
    fn test_overall_quality_without_rows() {
        let stats = DatasetStatistics {
            total_trips: 0,
            total_revenue: 0.0,
            date_range: DataDateRange {
                start: date(2020, 1, 1),
                end: date(2020, 1, 1),
            },
            by_service_type: Vec::new(),
        };
        assert_eq!(stats.overall_quality_pct(), None);
    }

    #[test]
    fn test_trip_record_deserializes() {
        let json = r#"{
            "trip_id": 7,
            "service_type": "yellow",
            "pickup_datetime": "2020-05-01T08:15:00",
            "dropoff_datetime": "2020-05-01T08:40:00",
            "pickup_borough": "Manhattan",
            "trip_distance": 3.2,
            "total_amount": 18.5,
            "trip_duration_sec": 1500
        }"#;
        let trip: TripRecord = serde_json::from_str(json).unwrap();

        assert_eq!(trip.trip_id, 7);
        assert_eq!(trip.pickup_borough.as_deref(), Some("Manhattan"));
        assert_eq!(trip.dropoff_zone, None);
        assert_eq!(trip.trip_duration_sec, Some(1500));
    }
}
