//! Timestamp helpers for snapshot naming and best-effort date parsing

use chrono::{DateTime, NaiveDate, Utc};

/// Filename-safe timestamp component, chronologically sortable.
pub fn filename_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Best-effort parse of a source-provided date string.
///
/// Sources expose dates in a handful of shapes; anything unparseable becomes
/// `None`, never an error.
pub fn parse_date_flex(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Full RFC 3339 timestamps first (OpenAlex occasionally returns these)
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    const FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%B %d, %Y", "%b %d, %Y"];
    for fmt in FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    // Bare year, pinned to January 1st
    if let Ok(year) = trimmed.parse::<i32>() {
        if (1900..=2200).contains(&year) {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filename_stamp_format() {
        let at = Utc.with_ymd_and_hms(2026, 8, 24, 13, 5, 9).unwrap();
        assert_eq!(filename_stamp(at), "20260824_130509");
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_date_flex("2026-01-15"),
            NaiveDate::from_ymd_opt(2026, 1, 15)
        );
    }

    #[test]
    fn test_parse_human_dates() {
        assert_eq!(
            parse_date_flex("January 15, 2026"),
            NaiveDate::from_ymd_opt(2026, 1, 15)
        );
        assert_eq!(
            parse_date_flex("15 January 2026"),
            NaiveDate::from_ymd_opt(2026, 1, 15)
        );
    }

    #[test]
    fn test_parse_bare_year() {
        assert_eq!(parse_date_flex("2024"), NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_date_flex("posted yesterday"), None);
        assert_eq!(parse_date_flex(""), None);
        assert_eq!(parse_date_flex("99999"), None);
    }
}
