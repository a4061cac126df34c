//! Timestamp parsing for the handful of date formats WhatsApp exports use.

use chrono::NaiveDateTime;

/// Formats observed across personal and Business exports.
const FORMATS: &[&str] = &[
    "%d/%m/%Y, %H:%M:%S",
    "%d/%m/%y, %H:%M:%S",
    "%d/%m/%Y, %H:%M",
    "%d/%m/%y, %H:%M",
    "%d-%m-%Y, %H:%M:%S",
    "%d-%m-%y, %H:%M:%S",
    "%d-%m-%Y, %H:%M",
    "%d-%m-%y, %H:%M",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%y, %I:%M:%S %p",
    "%m/%d/%Y, %I:%M %p",
    "%m/%d/%y, %I:%M %p",
    "%d-%m-%Y, %I:%M:%S %p",
    "%d-%m-%y, %I:%M:%S %p",
    "%d-%m-%Y, %I:%M %p",
    "%d-%m-%y, %I:%M %p",
];

/// Parse a message timestamp, trying each known format in turn.
///
/// Returns `None` for unrecognized formats; an unparseable timestamp never
/// fails the surrounding message line.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim_matches(|c| c == '[' || c == ']' || c == ' ');
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    tracing::debug!(timestamp = raw, "unrecognized timestamp format");
    None
}
