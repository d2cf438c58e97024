//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Duration, Utc};

/// Date format shown to operators for expiration dates
pub const EXPIRATION_DATE_FORMAT: &str = "%d/%m/%Y";

/// Compute an expiration date `days` days from now, `None` when out of range
pub fn expiration_from_days(days: i64) -> Option<DateTime<Utc>> {
    expiration_from(Utc::now(), days)
}

/// Compute an expiration date `days` days after `start`, `None` when out of range
pub fn expiration_from(start: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|delta| start.checked_add_signed(delta))
}

/// Format an expiration date for display
pub fn format_expiration_date(date: DateTime<Utc>) -> String {
    date.format(EXPIRATION_DATE_FORMAT).to_string()
}

/// Parse a Telegram user reference: a bare id or a `tg://user?id=` link
pub fn parse_telegram_id(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(id_str) = text.strip_prefix("tg://user?id=") {
        id_str.parse::<i64>().ok()
    } else {
        text.parse::<i64>().ok()
    }
}

/// True when the text is non-empty and made only of ASCII digits
pub fn is_ascii_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Check if a string contains only printable ASCII characters
pub fn is_printable_ascii(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii() && !c.is_control())
}

/// Split command arguments on whitespace
pub fn split_args(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Language code from a Telegram locale (e.g. "pt-BR" -> "pt")
pub fn base_language(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}
