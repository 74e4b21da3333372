//! Human readable rendering of sizes, amounts and timestamps.
//!
//! Sizes use binary prefixes. The base unit is rendered without decimals, every larger unit with
//! exactly two: `0 B`, `512 B`, `1.00 KB`, `1.50 KB`.

use chrono::{DateTime, NaiveDateTime, Utc};

/// The native token symbol of the data availability network.
pub const AVAIL_SYMBOL: &str = "AVAIL";

/// The binary-prefixed size units, in ascending order.
const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// The factor between two consecutive size units.
const SIZE_STEP: u128 = 1024;

/// Renders a byte count using the largest unit for which the scaled value is at least one.
pub fn format_bytes(bytes: u128) -> String {
    let mut unit = 0;
    let mut scale = 1u128;
    while unit < SIZE_UNITS.len() - 1 && bytes >= scale * SIZE_STEP {
        scale *= SIZE_STEP;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} {}", SIZE_UNITS[0])
    } else {
        format!("{:.2} {}", bytes as f64 / scale as f64, SIZE_UNITS[unit])
    }
}

/// Renders an amount of the native token with two decimals.
pub fn format_avail(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    format!("{amount:.2} {AVAIL_SYMBOL}")
}

/// Renders a USD value with two decimals.
pub fn format_usd(value: f64) -> String {
    format!("${value:.2}")
}

/// Renders the age of an indexer timestamp relative to `now`.
///
/// Indexer timestamps usually come without a zone designator, in which case they are read as UTC.
pub fn relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(at) = parse_timestamp(timestamp) else { return "Invalid date".to_string() };

    let minutes = (now - at).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    plural(hours / 24, "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let timestamp = timestamp.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_bytes_picks_largest_unit() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1), "1 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024 - 1), "1024.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(3 * 1024u128.pow(3) + 1024u128.pow(3) / 4), "3.25 GB");
    }

    #[test]
    fn test_format_bytes_caps_at_terabytes() {
        assert_eq!(format_bytes(2048 * 1024u128.pow(4)), "2048.00 TB");
    }

    #[test]
    fn test_format_avail_always_two_decimals() {
        assert_eq!(format_avail(12.3), "12.30 AVAIL");
        assert_eq!(format_avail(0.0), "0.00 AVAIL");
        assert_eq!(format_avail(1234.567), "1234.57 AVAIL");
        assert_eq!(format_avail(f64::NAN), "0.00 AVAIL");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.1234), "$0.12");
        assert_eq!(format_usd(42.0), "$42.00");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 8, 10, 12, 0, 0).unwrap();

        assert_eq!(relative_time("2024-08-10T11:59:30", now), "Just now");
        assert_eq!(relative_time("2024-08-10T11:59:00.000", now), "1 minute ago");
        assert_eq!(relative_time("2024-08-10T11:15:00Z", now), "45 minutes ago");
        assert_eq!(relative_time("2024-08-10T11:00:00", now), "1 hour ago");
        assert_eq!(relative_time("2024-08-10T02:00:00+00:00", now), "10 hours ago");
        assert_eq!(relative_time("2024-08-09T12:00:00", now), "1 day ago");
        assert_eq!(relative_time("2024-08-01T12:00:00", now), "9 days ago");
        assert_eq!(relative_time("2024-08-10T12:05:00", now), "Just now");
        assert_eq!(relative_time("yesterday", now), "Invalid date");
    }
}
