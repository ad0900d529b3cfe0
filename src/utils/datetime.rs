use chrono::{DateTime, Duration, Utc};

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%d.%m.%Y %H:%M UTC").to_string()
}

/// Renders a positive duration as `Xh Ym`.
pub fn format_time_left(left: Duration) -> String {
    let minutes = left.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_datetime(&dt), "07.03.2026 09:05 UTC");
    }

    #[test]
    fn test_format_time_left() {
        assert_eq!(format_time_left(Duration::minutes(125)), "2h 5m");
        assert_eq!(format_time_left(Duration::seconds(59)), "0h 0m");
        assert_eq!(format_time_left(Duration::hours(24)), "24h 0m");
        assert_eq!(format_time_left(Duration::minutes(-5)), "0h 0m");
    }
}
