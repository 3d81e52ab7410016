// ABOUTME: Display helpers for runtimes, ratings, release dates and long text.
// ABOUTME: All helpers return an empty string for values that cannot be rendered.

use chrono::Datelike;

use crate::dates::parse_release_date;

/// `125` -> `"2h 5min"`, `45` -> `"45min"`, `120` -> `"2h"`. Zero or negative gives `""`.
pub fn format_runtime(minutes: i64) -> String {
    if minutes <= 0 {
        return String::new();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{m}min"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}min"),
    }
}

/// One decimal place.
pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

/// Renders a release date as `dd/mm/yyyy`.
pub fn format_date(raw: &str) -> String {
    parse_release_date(raw)
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

pub fn release_year(raw: &str) -> Option<i32> {
    parse_release_date(raw).map(|date| date.year())
}

/// Cuts `text` to at most `max` characters and appends `...` when it was cut.
pub fn truncate_text(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}
