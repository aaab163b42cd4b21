use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::charts::granularity::granularity_for_span;
use crate::charts::types::{Bucket, BucketSet};
use crate::models::{DateRangeFilter, RawAggregateRow, canonical_service_type};

/// Groups raw aggregate rows into dense, ascending time buckets.
///
/// The granularity comes from the span between the earliest and latest row
/// date. Rows landing in the same slot are summed. Every bucket ends up with
/// an entry for every service type seen anywhere in `rows`, 0 where that type
/// had no rows. Empty input yields an empty day-granularity set.
///
/// `range` is the filter the rows were requested with; rows outside it are
/// still bucketed (the backend is the source of truth) but logged.
pub fn bucket_rows(rows: &[RawAggregateRow], range: &DateRangeFilter) -> BucketSet {
    let Some(first) = rows.first() else {
        return BucketSet::default();
    };

    let (min_date, max_date) = rows.iter().fold((first.date, first.date), |(lo, hi), row| {
        (lo.min(row.date), hi.max(row.date))
    });
    let span_days = (max_date - min_date).num_days();
    let granularity = granularity_for_span(span_days);

    let mut service_types: Vec<String> = Vec::new();
    let mut grouped: BTreeMap<String, Bucket> = BTreeMap::new();
    let mut out_of_range = 0usize;

    for row in rows {
        if !range.contains(row.date) {
            out_of_range += 1;
        }

        let service = canonical_service_type(&row.service_type);
        if !service_types.contains(&service) {
            service_types.push(service.clone());
        }

        let bucket = grouped
            .entry(granularity.sort_key(row.date))
            .or_insert_with(|| Bucket::new(granularity, row.date));

        *bucket.per_service.entry(service).or_insert(0) += row.trip_count;
        bucket.revenue_total += row.revenue;
    }

    for bucket in grouped.values_mut() {
        for service in &service_types {
            bucket.per_service.entry(service.clone()).or_insert(0);
        }
    }

    if out_of_range > 0 {
        warn!(
            out_of_range,
            start = %range.start(),
            end = %range.end(),
            "Aggregate rows fall outside the requested range"
        );
    }

    // BTreeMap iteration is ascending by key, and keys sort chronologically.
    let buckets: Vec<Bucket> = grouped.into_values().collect();

    debug!(
        rows = rows.len(),
        span_days,
        ?granularity,
        buckets = buckets.len(),
        services = service_types.len(),
        "Bucketed aggregate rows"
    );

    BucketSet {
        granularity,
        buckets,
        service_types,
    }
}
