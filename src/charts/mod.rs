//! Chart-data assembly.
//!
//! Raw per-day, per-service rows are grouped into dense time buckets at a
//! granularity derived from the span of the data, then turned into named,
//! colored series a renderer can draw without further computation.

pub mod bucketing;
pub mod granularity;
pub mod labels;
pub mod palette;
pub mod series;
pub mod types;

pub use bucketing::bucket_rows;
pub use granularity::{Granularity, granularity_for_span};
pub use series::{build_series, build_trend_series, distribution_series};
pub use types::{Bucket, BucketSet, ChartSeries, DistributionSeries, Rgb, SeriesSet};
