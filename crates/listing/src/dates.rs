// ABOUTME: Release date parsing for movie records.
// ABOUTME: Accepts plain ISO dates and full timestamps; anything else is treated as unknown.

use chrono::{DateTime, NaiveDate};

/// Parses a release date string into a calendar date.
/// Returns None for empty or unrecognized input.
pub fn parse_release_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    // Some upstream mirrors send full timestamps
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    None
}
