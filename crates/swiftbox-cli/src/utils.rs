//! Utility functions for the Swiftbox CLI

use chrono::{DateTime, Utc};

/// Format a datetime for listings
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format size as human readable
pub fn format_size(bytes: i64, human_readable: bool) -> String {
    if human_readable {
        humansize::format_size(bytes.max(0) as u64, humansize::BINARY)
    } else {
        bytes.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(1024, false), "1024");
        assert_eq!(format_size(1024, true), "1 KiB");
        assert_eq!(format_size(0, true), "0 B");
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(format_datetime(&dt), "2024-05-01 12:30:00");
    }
}
