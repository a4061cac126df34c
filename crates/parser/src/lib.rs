//! WhatsApp chat-export parsing.
//!
//! Takes the full text of one exported chat and produces one
//! [`ParsedLead`] per distinct phone number: numbers appearing as message
//! senders (unsaved contacts show as their number) and numbers mentioned in
//! message bodies. Lines that match no known message format are skipped, so a
//! parse never fails on malformed input; only oversized inputs are rejected.

pub mod phone;
pub mod timestamp;

use indexmap::IndexMap;
use leads_core::{merge_display_name, ParsedLead};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Reject inputs larger than this many bytes.
pub const MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
/// Reject inputs with more lines than this.
pub const MAX_INPUT_LINES: usize = 100_000;

/// Message-line formats across personal and Business exports.
///
/// 1. `[12/03/24, 14:05:33] Name: message`
/// 2. `12/03/24, 14:05 - Name: message`
/// 3. `12-03-24, 14:05 - Name: message`
static MESSAGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let timestamp_slash = r"\d{1,2}/\d{1,2}/\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?(?:\s[AP]M)?";
    let timestamp_dash = r"\d{1,2}-\d{1,2}-\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?(?:\s[AP]M)?";
    vec![
        Regex::new(&format!(r"^\[({timestamp_slash})\]\s([^:]+):\s(.+)$")).unwrap(),
        Regex::new(&format!(r"^({timestamp_slash})\s-\s([^:]+):\s(.+)$")).unwrap(),
        Regex::new(&format!(r"^({timestamp_dash})\s-\s([^:]+):\s(.+)$")).unwrap(),
    ]
});

/// Errors from parsing a chat export.
///
/// Unrecognized lines are not errors; only inputs over the hard caps fail.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("chat export too large: {bytes} bytes (max {max})")]
    TooLarge { bytes: usize, max: usize },

    #[error("chat export has too many lines: {lines} (max {max})")]
    TooManyLines { lines: usize, max: usize },
}

/// One matched message line.
struct MessageLine<'a> {
    timestamp: &'a str,
    sender: &'a str,
    body: &'a str,
}

/// Parse a chat export into candidate leads.
///
/// `default_country_code` expands local zero-prefixed numbers, see
/// [`phone::normalize`]. The output is ordered by first appearance and
/// contains at most one entry per normalized number; repeat sightings fold
/// through [`merge_display_name`].
pub fn parse_chat(content: &str, default_country_code: &str) -> Result<Vec<ParsedLead>, ParseError> {
    if content.len() > MAX_INPUT_BYTES {
        return Err(ParseError::TooLarge {
            bytes: content.len(),
            max: MAX_INPUT_BYTES,
        });
    }

    let mut leads: IndexMap<String, ParsedLead> = IndexMap::new();
    let mut line_count = 0usize;

    for line in content.lines() {
        line_count += 1;
        if line_count > MAX_INPUT_LINES {
            return Err(ParseError::TooManyLines {
                lines: line_count,
                max: MAX_INPUT_LINES,
            });
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // System messages and message continuations match no pattern and are
        // skipped.
        let Some(message) = match_message_line(line) else {
            continue;
        };

        let first_seen = timestamp::parse_timestamp(message.timestamp);

        // A sender shown as a bare number is an unsaved contact, the main
        // thing this parser exists to find.
        if let Some(number) = phone::normalize(message.sender, default_country_code) {
            record(
                &mut leads,
                number,
                Some(message.sender.trim()),
                first_seen,
            );
        }

        // Numbers mentioned inside the message body carry no name.
        for number in phone::extract_from_text(message.body, default_country_code) {
            record(&mut leads, number, None, first_seen);
        }
    }

    tracing::debug!(lines = line_count, leads = leads.len(), "parsed chat export");
    Ok(leads.into_values().collect())
}

/// Fold one sighting of a number into the accumulator.
fn record(
    leads: &mut IndexMap<String, ParsedLead>,
    phone_number: String,
    display_name: Option<&str>,
    first_seen: Option<chrono::NaiveDateTime>,
) {
    match leads.get_mut(&phone_number) {
        Some(existing) => {
            existing.display_name = merge_display_name(
                existing.display_name.as_deref(),
                display_name,
                &phone_number,
            );
            if existing.first_seen.is_none() {
                existing.first_seen = first_seen;
            }
        }
        None => {
            leads.insert(
                phone_number.clone(),
                ParsedLead {
                    phone_number,
                    display_name: display_name.map(str::to_string),
                    first_seen,
                },
            );
        }
    }
}

/// Match a line against the known message formats.
fn match_message_line(line: &str) -> Option<MessageLine<'_>> {
    for pattern in MESSAGE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(line) {
            return Some(MessageLine {
                timestamp: captures.get(1)?.as_str(),
                sender: captures.get(2)?.as_str(),
                body: captures.get(3)?.as_str(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const CC: &str = "234";

    #[test]
    fn test_parse_bracketed_format() {
        let chat = "[12/03/24, 14:05:33] +234 801 111 1111: hello\n";
        let leads = parse_chat(chat, CC).unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].phone_number, "+2348011111111");
        assert_eq!(leads[0].display_name.as_deref(), Some("+234 801 111 1111"));
        assert!(leads[0].first_seen.is_some());
    }

    #[test]
    fn test_parse_dash_format() {
        let chat = "12/03/24, 14:05 - +2348011111111: hello\n\
                    12-03-24, 14:06 - +2348022222222: hi\n";
        let leads = parse_chat(chat, CC).unwrap();
        assert_eq!(leads.len(), 2);
    }

    #[test]
    fn test_named_sender_yields_no_lead_without_number() {
        // A saved contact's number is not visible in the export.
        let chat = "12/03/24, 14:05 - Alice: see you tomorrow\n";
        assert!(parse_chat(chat, CC).unwrap().is_empty());
    }

    #[test]
    fn test_numbers_in_message_bodies() {
        let chat = "12/03/24, 14:05 - Alice: reach me on 08011111111\n";
        let leads = parse_chat(chat, CC).unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].phone_number, "+2348011111111");
        assert_eq!(leads[0].display_name, None);
    }

    #[test]
    fn test_system_messages_and_garbage_are_skipped() {
        let chat = "\
12/03/24, 14:04 - Messages and calls are end-to-end encrypted.\n\
this line is a continuation of a previous message\n\
\n\
12/03/24, 14:05 - +2348011111111: hello\n";
        let leads = parse_chat(chat, CC).unwrap();
        assert_eq!(leads.len(), 1);
    }

    #[test]
    fn test_repeat_sightings_fold_into_one_lead() {
        let chat = "\
12/03/24, 14:05 - +2348011111111: first\n\
12/03/24, 14:06 - +2348011111111: second\n";
        let leads = parse_chat(chat, CC).unwrap();
        assert_eq!(leads.len(), 1);
    }

    #[test]
    fn test_body_sighting_then_sender_keeps_number_name() {
        // Seen first in a body (no name), later as a sender (number-shaped
        // name). The number-shaped name fills the gap.
        let chat = "\
12/03/24, 14:05 - Alice: ping +2348011111111 about it\n\
12/03/24, 14:06 - +2348011111111: got it\n";
        let leads = parse_chat(chat, CC).unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].display_name.as_deref(), Some("+2348011111111"));
    }

    #[test]
    fn test_first_seen_is_first_appearance() {
        let chat = "\
12/03/24, 14:05 - +2348011111111: first\n\
12/03/24, 18:30 - +2348011111111: later\n";
        let leads = parse_chat(chat, CC).unwrap();
        let ts = leads[0].first_seen.unwrap();
        assert_eq!(ts.format("%H:%M").to_string(), "14:05");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let chat = "\
12/03/24, 14:05 - +2348011111111: a\n\
12/03/24, 14:06 - Alice: call 08022222222\n\
12/03/24, 14:07 - +2348033333333: b\n";
        let first = parse_chat(chat, CC).unwrap();
        let second = parse_chat(chat, CC).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_yields_no_leads() {
        assert!(parse_chat("", CC).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_input_is_rejected() {
        let line = "12/03/24, 14:05 - +2348011111111: hello\n";
        let chat = line.repeat(MAX_INPUT_LINES + 1);
        match parse_chat(&chat, CC) {
            Err(ParseError::TooLarge { .. } | ParseError::TooManyLines { .. }) => {}
            other => panic!("expected size rejection, got {:?}", other.map(|l| l.len())),
        }
    }
}
