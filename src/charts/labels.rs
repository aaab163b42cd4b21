//! Pure label formatting for axes, tooltips and summary cards.

use chrono::NaiveDate;

use crate::charts::granularity::Granularity;

/// Short axis label: `"May 1"`, `"May 2020"` or `"2020"`.
pub fn display_label(granularity: Granularity, bucket_start: NaiveDate) -> String {
    let pattern = match granularity {
        Granularity::Day => "%b %-d",
        Granularity::Month => "%b %Y",
        Granularity::Year => "%Y",
    };
    bucket_start.format(pattern).to_string()
}

/// Unambiguous label, always month, day and year: `"May 1, 2020"`.
pub fn full_label(bucket_start: NaiveDate) -> String {
    bucket_start.format("%b %-d, %Y").to_string()
}

/// Integer with thousands separators: `1234567` -> `"1,234,567"`.
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Dollar amount with two decimals: `1234.5` -> `"$1,234.50"`.
pub fn format_currency(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (whole, cents) = rendered.split_once('.').unwrap_or((&rendered, "00"));
    let sign = if value < 0.0 && rendered != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Minutes with one decimal: `15.0` -> `"15.0 min"`.
pub fn format_minutes(minutes: f64) -> String {
    format!("{minutes:.1} min")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_display_labels() {
        let d = date(2020, 5, 1);
        assert_eq!(display_label(Granularity::Day, d), "May 1");
        assert_eq!(display_label(Granularity::Month, d), "May 2020");
        assert_eq!(display_label(Granularity::Year, d), "2020");
    }

    #[test]
    fn test_full_label() {
        assert_eq!(full_label(date(2020, 12, 25)), "Dec 25, 2020");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(123.456), "$123.46");
        assert_eq!(format_currency(-12.0), "-$12.00");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(15.0), "15.0 min");
        assert_eq!(format_minutes(12.34), "12.3 min");
    }
}
