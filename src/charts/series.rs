use tracing::debug;

use crate::charts::palette::{BOROUGH_COLOR, REVENUE_COLOR, color_for_service};
use crate::charts::types::{BucketSet, ChartSeries, DistributionSeries, PieSlice, SeriesSet};
use crate::models::{SummaryStats, canonical_service_type, service_display_name};

pub const REVENUE_SERIES_NAME: &str = "Revenue";
pub const DISTRIBUTION_SERIES_NAME: &str = "Trips by Service Type";
pub const BOROUGH_SERIES_NAME: &str = "Trips by Pickup Borough";

/// One trip-count line per service type, in first-seen order.
pub fn line_series(set: &BucketSet) -> Vec<ChartSeries> {
    set.service_types
        .iter()
        .map(|service| {
            ChartSeries::from_values(
                &service_display_name(service),
                color_for_service(service),
                set.buckets.iter().map(|b| b.trips_for(service) as f64),
            )
        })
        .collect()
}

/// Revenue total per bucket.
pub fn revenue_series(set: &BucketSet) -> ChartSeries {
    ChartSeries::from_values(
        REVENUE_SERIES_NAME,
        REVENUE_COLOR,
        set.buckets.iter().map(|b| b.revenue_total),
    )
}

/// Line and bar series for a bucket set.
pub fn build_trend_series(set: &BucketSet) -> (Vec<ChartSeries>, ChartSeries) {
    (line_series(set), revenue_series(set))
}

/// Trip share per service type, taken from backend totals.
///
/// Absent summary gives an empty distribution. Entries that canonicalize to
/// the same code are merged.
pub fn distribution_series(summary: Option<&SummaryStats>) -> DistributionSeries {
    let Some(summary) = summary else {
        return DistributionSeries {
            name: DISTRIBUTION_SERIES_NAME.to_string(),
            slices: Vec::new(),
        };
    };

    let mut slices: Vec<PieSlice> = Vec::with_capacity(summary.by_service_type.len());
    for entry in &summary.by_service_type {
        let label = canonical_service_type(&entry.service_type);
        match slices.iter_mut().find(|s| s.label == label) {
            Some(slice) => slice.value += entry.total_trips as f64,
            None => slices.push(PieSlice {
                color: color_for_service(&label),
                label,
                value: entry.total_trips as f64,
            }),
        }
    }

    DistributionSeries {
        name: DISTRIBUTION_SERIES_NAME.to_string(),
        slices,
    }
}

/// Trip count per pickup borough, in backend order.
pub fn borough_series(summary: Option<&SummaryStats>) -> ChartSeries {
    let values: Vec<f64> = summary
        .map(|s| s.by_borough.iter().map(|b| b.trip_count as f64).collect())
        .unwrap_or_default();
    ChartSeries::from_values(BOROUGH_SERIES_NAME, BOROUGH_COLOR, values)
}

/// Borough names aligned with [`borough_series`] points.
pub fn borough_labels(summary: Option<&SummaryStats>) -> Vec<String> {
    summary
        .map(|s| s.by_borough.iter().map(|b| b.pickup_borough.clone()).collect())
        .unwrap_or_default()
}

/// Builds every series for one refresh.
pub fn build_series(set: &BucketSet, summary: Option<&SummaryStats>) -> SeriesSet {
    let (line, bar) = build_trend_series(set);
    let pie = distribution_series(summary);
    let boroughs = borough_series(summary);

    debug!(
        lines = line.len(),
        points = bar.points.len(),
        slices = pie.slices.len(),
        "Built chart series"
    );

    SeriesSet {
        line,
        bar,
        pie,
        boroughs,
    }
}
