//! Display formatting helpers consumed by column renderers
//!
//! These are plain functions; a caller may swap any of them for its own.

use chrono::{TimeZone, Utc};
use std::fmt::Display;

/// Span duration: milliseconds below one second, seconds above, 2 decimals.
pub fn format_duration(microseconds: i64) -> String {
    if microseconds >= 1_000_000 {
        format!("{:.2}s", microseconds as f64 / 1_000_000.0)
    } else {
        format!("{:.2}ms", microseconds as f64 / 1_000.0)
    }
}

/// Cost duration with a microsecond tier, used by chain metrics.
pub fn format_duration_us(microseconds: f64) -> String {
    if microseconds == 0.0 || !microseconds.is_finite() {
        "0us".to_string()
    } else if microseconds >= 1_000_000.0 {
        format!("{:.2}s", microseconds / 1_000_000.0)
    } else if microseconds >= 1_000.0 {
        format!("{:.2}ms", microseconds / 1_000.0)
    } else {
        format!("{:.2}us", microseconds)
    }
}

/// Ratio in `[0, 1]` as a percentage with 2 decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Absolute start time as `YYYY-MM-DD HH:MM:SS` (24-hour) in `tz`.
///
/// Both supported locales use the Gregorian calendar with this exact
/// numeric layout, so the locale does not change the output. Timestamps
/// outside chrono's range render as `-`.
pub fn format_start_time<Tz>(microseconds: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match Utc.timestamp_millis_opt(microseconds.div_euclid(1_000)).single() {
        Some(utc) => utc.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Truncate string with ellipsis
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_tiers() {
        assert_eq!(format_duration(1_000_000), "1.00s");
        assert_eq!(format_duration(2_645_756), "2.65s");
        assert_eq!(format_duration(999_999), "1000.00ms");
        assert_eq!(format_duration(500_000), "500.00ms");
        assert_eq!(format_duration(178), "0.18ms");
        assert_eq!(format_duration(0), "0.00ms");
    }

    #[test]
    fn test_format_duration_us_tiers() {
        assert_eq!(format_duration_us(0.0), "0us");
        assert_eq!(format_duration_us(12.5), "12.50us");
        assert_eq!(format_duration_us(1_500.0), "1.50ms");
        assert_eq!(format_duration_us(3_000_000.0), "3.00s");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.5), "50.00%");
        assert_eq!(format_percent(0.0123), "1.23%");
        assert_eq!(format_percent(1.0), "100.00%");
    }

    #[test]
    fn test_format_start_time_utc() {
        // 2026-02-22 15:40:55.030459 UTC
        assert_eq!(
            format_start_time(1_771_774_855_030_459, &Utc),
            "2026-02-22 15:40:55"
        );
        assert_eq!(format_start_time(0, &Utc), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_format_start_time_fixed_offset() {
        let shanghai = chrono::FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            format_start_time(1_771_774_855_030_459, &shanghai),
            "2026-02-22 23:40:55"
        );
    }

    #[test]
    fn test_format_start_time_out_of_range() {
        assert_eq!(format_start_time(i64::MAX, &Utc), "-");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a longer name", 8), "a lon...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }
}
