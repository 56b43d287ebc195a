//! Core types and constants

use chrono::{DateTime, Utc};

/// Timestamp type used throughout the library
pub type Timestamp = DateTime<Utc>;

/// ISO-style currency code (short uppercase string, e.g. "USD")
pub type CurrencyCode = String;

/// Money amount, denominated in whatever currency the context says
pub type Amount = f64;

/// Exchange-rate factor: units of the base currency per 1 unit of a currency
pub type Rate = f64;

/// The base currency every rate-table factor is expressed against.
/// Always present in a valid table with a factor of exactly 1.0.
pub const BASE_CURRENCY: &str = "TWD";

/// Currencies the calculator surfaces by default, with their flag emoji.
/// UI layers use this for the quick-select row; the rate table itself may
/// carry more codes than these.
pub fn known_currencies() -> &'static [(&'static str, &'static str)] {
    &[
        ("TWD", "🇹🇼"),
        ("USD", "🇺🇸"),
        ("JPY", "🇯🇵"),
        ("EUR", "🇪🇺"),
        ("CNY", "🇨🇳"),
        ("HKD", "🇭🇰"),
        ("GBP", "🇬🇧"),
        ("AUD", "🇦🇺"),
        ("SGD", "🇸🇬"),
        ("KRW", "🇰🇷"),
    ]
}

/// Flag emoji for a currency code, if it is one of the known set
pub fn flag_for(code: &str) -> Option<&'static str> {
    known_currencies()
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, flag)| *flag)
}
