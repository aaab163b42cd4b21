//! CSV export of the loaded aggregate rows.
//!
//! Serializes the raw rows behind the chart, one line per row in load order,
//! not the merged buckets.

use csv::WriterBuilder;
use std::fs::File;
use tracing::{debug, info};

use crate::error::DashboardError;
use crate::models::RawAggregateRow;

pub const CSV_HEADER: [&str; 7] = [
    "Date",
    "Service Type",
    "Total Trips",
    "Total Revenue",
    "Avg Distance",
    "Avg Duration (min)",
    "Avg Fare",
];

/// Formats one row. Missing averages are written as 0.
pub fn export_record(row: &RawAggregateRow) -> [String; 7] {
    let duration_minutes = row.avg_duration_seconds.unwrap_or(0.0) / 60.0;
    [
        row.date.format("%Y-%m-%d").to_string(),
        row.service_type.clone(),
        row.trip_count.to_string(),
        format!("{:.2}", row.revenue),
        format!("{:.2}", row.avg_distance.unwrap_or(0.0)),
        format!("{duration_minutes:.1}"),
        format!("{:.2}", row.avg_fare.unwrap_or(0.0)),
    ]
}

fn write_rows<W: std::io::Write>(
    writer: W,
    rows: &[RawAggregateRow],
) -> Result<W, DashboardError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record(export_record(row))?;
    }
    writer.flush()?;

    writer.into_inner().map_err(|e| DashboardError::Io(e.into_error()))
}

/// Renders rows as CSV text suitable for a file download.
pub fn aggregates_to_csv(rows: &[RawAggregateRow]) -> Result<String, DashboardError> {
    let bytes = write_rows(Vec::new(), rows)?;
    debug!(rows = rows.len(), bytes = bytes.len(), "Rendered aggregate CSV");
    Ok(String::from_utf8(bytes)?)
}

/// Writes rows to `path`, replacing any existing file.
pub fn write_csv(path: &str, rows: &[RawAggregateRow]) -> Result<(), DashboardError> {
    let file = File::create(path)?;
    write_rows(file, rows)?;
    info!(path, rows = rows.len(), "Exported aggregates to CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_row() -> RawAggregateRow {
        RawAggregateRow::new(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), "yellow", 10, 123.456)
            .with_averages(2.5, 900.0, 12.3)
    }

    #[test]
    fn test_single_row_export() {
        let csv = aggregates_to_csv(&[sample_row()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Date,Service Type,Total Trips,Total Revenue,Avg Distance,Avg Duration (min),Avg Fare",
                "2020-01-01,yellow,10,123.46,2.50,15.0,12.30",
            ]
        );
    }

    #[test]
    fn test_missing_averages_export_as_zero() {
        let day = NaiveDate::from_ymd_opt(2020, 5, 2).unwrap();
        let row = RawAggregateRow::new(day, "fhv", 3, 0.0);
        let record = export_record(&row);
        assert_eq!(record[3], "0.00");
        assert_eq!(record[4], "0.00");
        assert_eq!(record[5], "0.0");
        assert_eq!(record[6], "0.00");
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let csv = aggregates_to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("Date,Service Type"));
    }

    #[test]
    fn test_rows_keep_load_order() {
        let may = |d| NaiveDate::from_ymd_opt(2020, 5, d).unwrap();
        let later = RawAggregateRow::new(may(9), "green", 1, 1.0);
        let earlier = RawAggregateRow::new(may(1), "green", 2, 2.0);
        let csv = aggregates_to_csv(&[later, earlier]).unwrap();

        let dates: Vec<&str> = csv
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(dates, vec!["2020-05-09", "2020-05-01"]);
    }

    #[test]
    fn test_write_csv_creates_file() {
        let path = temp_path("trip_dashboard_test_export.csv");
        let _ = fs::remove_file(&path);

        write_csv(&path, &[sample_row(), sample_row()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert_eq!(content, aggregates_to_csv(&[sample_row(), sample_row()]).unwrap());

        fs::remove_file(&path).unwrap();
    }
}
