use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// `"March 2025"`, the line shown under the hero title.
pub fn month_year<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn formats_full_month_name_and_year() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).single();

        assert_eq!(now.as_ref().map(month_year), Some("March 2025".to_string()));
    }

    #[test]
    fn uses_the_local_calendar_date() {
        // 23:30 UTC on New Year's Eve is already January in UTC+2.
        let offset = FixedOffset::east_opt(2 * 3600);
        let now = Utc
            .with_ymd_and_hms(2025, 12, 31, 23, 30, 0)
            .single()
            .zip(offset)
            .map(|(utc, offset)| utc.with_timezone(&offset));

        assert_eq!(now.as_ref().map(month_year), Some("January 2026".to_string()));
    }
}
