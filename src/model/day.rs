use chrono::{Datelike, Local, NaiveTime};

/// Buckets per board, indexed 0 (Sunday) through 6 (Saturday)
pub const DAYS_PER_WEEK: u8 = 7;

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const DAY_SHORT_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Full weekday name for an index, `"?"` when out of range
pub fn day_name(day: u8) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("?")
}

pub fn day_short_name(day: u8) -> &'static str {
    DAY_SHORT_NAMES.get(day as usize).copied().unwrap_or("?")
}

/// Today's weekday index in local time
pub fn today() -> u8 {
    Local::now().weekday().num_days_from_sunday() as u8
}

/// Parse a day given as an index (`0`..`6`) or an English name/prefix
/// of at least three letters (`mon`, `Tuesday`).
pub fn parse_day(s: &str) -> Option<u8> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u8>() {
        return (n < DAYS_PER_WEEK).then_some(n);
    }
    if s.len() < 3 {
        return None;
    }
    let lower = s.to_lowercase();
    DAY_NAMES
        .iter()
        .position(|name| name.to_lowercase().starts_with(&lower))
        .map(|i| i as u8)
}

/// True for a 24-hour `HH:MM` time, the only form a time input produces
pub fn is_valid_time(s: &str) -> bool {
    s.len() == 5 && NaiveTime::parse_from_str(s, "%H:%M").is_ok()
}
