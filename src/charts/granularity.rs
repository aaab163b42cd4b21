use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Time unit used to group rows for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Granularity {
    #[default]
    Day,
    Month,
    Year,
}

/// Longest span, in days, still drawn one point per day.
pub const DAY_SPAN_MAX: i64 = 60;
/// Longest span, in days, still drawn one point per month.
pub const MONTH_SPAN_MAX: i64 = 365;

/// Picks a granularity from the number of days between the first and last row.
///
/// | Span (days) | Granularity |
/// |-------------|-------------|
/// | <= 60       | Day         |
/// | 61 ..= 365  | Month       |
/// | > 365       | Year        |
pub fn granularity_for_span(span_days: i64) -> Granularity {
    match span_days {
        s if s <= DAY_SPAN_MAX => Granularity::Day,
        s if s <= MONTH_SPAN_MAX => Granularity::Month,
        _ => Granularity::Year,
    }
}

impl Granularity {
    /// First day of the slot `date` falls into.
    pub fn truncate(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Month => date.with_day(1).unwrap_or(date),
            Granularity::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }

    /// Bucket key whose lexical order is chronological order.
    pub fn sort_key(self, date: NaiveDate) -> String {
        let pattern = match self {
            Granularity::Day => "%Y-%m-%d",
            Granularity::Month => "%Y-%m",
            Granularity::Year => "%Y",
        };
        date.format(pattern).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_span_boundaries() {
        assert_eq!(granularity_for_span(0), Granularity::Day);
        assert_eq!(granularity_for_span(60), Granularity::Day);
        assert_eq!(granularity_for_span(61), Granularity::Month);
        assert_eq!(granularity_for_span(365), Granularity::Month);
        assert_eq!(granularity_for_span(366), Granularity::Year);
        assert_eq!(granularity_for_span(4000), Granularity::Year);
    }

    #[test]
    fn test_truncate() {
        let d = date(2020, 5, 17);
        assert_eq!(Granularity::Day.truncate(d), d);
        assert_eq!(Granularity::Month.truncate(d), date(2020, 5, 1));
        assert_eq!(Granularity::Year.truncate(d), date(2020, 1, 1));
    }

    #[test]
    fn test_sort_keys_order_chronologically() {
        assert_eq!(Granularity::Day.sort_key(date(2020, 5, 7)), "2020-05-07");
        assert_eq!(Granularity::Month.sort_key(date(2020, 5, 7)), "2020-05");
        assert_eq!(Granularity::Year.sort_key(date(2020, 5, 7)), "2020");

        // zero padding keeps lexical == chronological
        let sept = Granularity::Month.sort_key(date(2020, 9, 1));
        let oct = Granularity::Month.sort_key(date(2020, 10, 1));
        assert!(sept < oct);

        let ninth = Granularity::Day.sort_key(date(2020, 1, 9));
        let tenth = Granularity::Day.sort_key(date(2020, 1, 10));
        assert!(ninth < tenth);
    }
}
