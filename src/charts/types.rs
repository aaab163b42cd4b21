//! Data types produced by the bucketing and series stages.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::charts::granularity::Granularity;
use crate::charts::labels::{display_label, full_label};

/// One time slot spanning every service type.
///
/// Labels are computed once at construction so tooltips and axes read the
/// same cached strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub sort_key: String,
    pub display_label: String,
    pub full_label: String,
    pub start: NaiveDate,
    pub per_service: BTreeMap<String, u64>,
    pub revenue_total: f64,
}

impl Bucket {
    pub(crate) fn new(granularity: Granularity, date: NaiveDate) -> Self {
        let start = granularity.truncate(date);
        Self {
            sort_key: granularity.sort_key(start),
            display_label: display_label(granularity, start),
            full_label: full_label(start),
            start,
            per_service: BTreeMap::new(),
            revenue_total: 0.0,
        }
    }

    /// Trip count for `service_type`, 0 when the type has no rows in this slot.
    pub fn trips_for(&self, service_type: &str) -> u64 {
        self.per_service.get(service_type).copied().unwrap_or(0)
    }

    pub fn total_trips(&self) -> u64 {
        self.per_service.values().sum()
    }
}

/// Output of the bucketing stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BucketSet {
    pub granularity: Granularity,
    pub buckets: Vec<Bucket>,
    /// Distinct canonical service types in first-seen order.
    pub service_types: Vec<String>,
}

impl BucketSet {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn display_labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.display_label.as_str()).collect()
    }

    /// Tooltip lookup by point position.
    pub fn full_label_at(&self, bucket_index: usize) -> Option<&str> {
        self.buckets.get(bucket_index).map(|b| b.full_label.as_str())
    }
}

/// 24-bit color, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub bucket_index: usize,
    pub value: f64,
}

/// A named, colored sequence of points aligned 1:1 with its categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn from_values(name: &str, color: Rgb, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            name: name.to_string(),
            color,
            points: values
                .into_iter()
                .enumerate()
                .map(|(bucket_index, value)| SeriesPoint { bucket_index, value })
                .collect(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub color: Rgb,
    pub value: f64,
}

/// Share-of-total chart; each slice carries its own color.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DistributionSeries {
    pub name: String,
    pub slices: Vec<PieSlice>,
}

impl DistributionSeries {
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Everything the renderer needs for one dashboard refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSet {
    pub line: Vec<ChartSeries>,
    pub bar: ChartSeries,
    pub pie: DistributionSeries,
    pub boroughs: ChartSeries,
}
