//! Log rendering of the loaded dashboard views.

use tracing::{info, warn};
use trip_dashboard::{
    charts::labels::{format_count, format_currency, format_minutes},
    coordinator::{ChartView, PaginationState, SummaryView, TableView, ViewState},
    models::{DatasetStatistics, service_display_name},
};

pub fn log_summary(view: &ViewState<SummaryView>) {
    if let Some(err) = view.error() {
        warn!(error = %err, stale = view.is_stale(), "{}", err.user_message());
    }
    let Some(summary) = view.data() else {
        return;
    };
    if summary.is_empty() {
        info!("No trips in the selected range");
        return;
    }

    let stats = &summary.stats;
    info!(
        total_trips = %format_count(stats.total_trips),
        total_revenue = %format_currency(stats.total_revenue),
        avg_distance = %format!("{:.2} mi", stats.avg_distance),
        avg_duration = %format_minutes(stats.avg_duration_minutes),
        avg_fare = %format_currency(stats.avg_fare),
        "Summary"
    );

    for slice in &summary.distribution.slices {
        info!(
            service_type = %service_display_name(&slice.label),
            trips = %format_count(slice.value as u64),
            color = %slice.color,
            "Trips by service type"
        );
    }
    for (borough, point) in summary.borough_labels.iter().zip(&summary.boroughs.points) {
        info!(
            borough = %borough,
            trips = %format_count(point.value as u64),
            "Trips by pickup borough"
        );
    }
}

pub fn log_chart(view: &ViewState<ChartView>) {
    if let Some(err) = view.error() {
        warn!(error = %err, stale = view.is_stale(), "{}", err.user_message());
    }
    let Some(chart) = view.data() else {
        return;
    };

    info!(
        granularity = ?chart.buckets.granularity,
        buckets = chart.buckets.len(),
        services = chart.line.len(),
        "Trend chart"
    );
    if chart.truncated {
        warn!(
            rows = chart.rows.len(),
            "Range has more rows than one chart page; earliest dates are not shown"
        );
    }
    for (i, bucket) in chart.buckets.buckets.iter().enumerate() {
        let revenue = chart.bar.points.get(i).map(|p| p.value).unwrap_or_default();
        info!(
            bucket = %bucket.full_label,
            label = %bucket.display_label,
            trips = %format_count(bucket.total_trips()),
            revenue = %format_currency(revenue),
            "Bucket"
        );
    }
}

pub fn log_table(view: &ViewState<TableView>, pagination: &PaginationState) {
    if let Some(err) = view.error() {
        warn!(error = %err, stale = view.is_stale(), "{}", err.user_message());
    }
    let Some(table) = view.data() else {
        return;
    };

    info!(
        page = table.page,
        total_pages = pagination.total_pages(),
        total_records = %format_count(pagination.total_records()),
        rows = table.rows.len(),
        "Trip table"
    );
    for trip in &table.rows {
        info!(
            trip_id = trip.trip_id,
            service_type = %trip.service_type,
            pickup = %trip.pickup_datetime,
            borough = trip.pickup_borough.as_deref().unwrap_or("-"),
            fare = %trip.total_amount.map(format_currency).unwrap_or_default(),
            "Trip"
        );
    }
}

pub fn log_statistics(stats: &DatasetStatistics) {
    info!(
        total_trips = %format_count(stats.total_trips),
        total_revenue = %format_currency(stats.total_revenue),
        start = %stats.date_range.start,
        end = %stats.date_range.end,
        quality = %stats
            .overall_quality_pct()
            .map(|pct| format!("{pct:.1}%"))
            .unwrap_or_default(),
        "Dataset"
    );
    for service in &stats.by_service_type {
        info!(
            service_type = %service_display_name(&service.service_type),
            trips = %format_count(service.total_trips),
            valid = %format_count(service.valid_trips),
            quality = %format!("{:.1}%", service.data_quality_pct),
            "Data quality"
        );
    }
}
