//! Phone number extraction and normalization.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum digits in a valid candidate.
const MIN_DIGITS: usize = 10;
/// Maximum digits in a valid candidate (E.164 cap).
const MAX_DIGITS: usize = 15;

/// Patterns for phone numbers embedded in message text.
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // International: +234 801 111 1111, +44-20-7946-0958
        Regex::new(r"\+\d{1,4}[\s-]?\d{3,}[\s-]?\d{3,}[\s-]?\d{2,}").unwrap(),
        // Bare 10-15 digit runs
        Regex::new(r"\b\d{10,15}\b").unwrap(),
        // Local zero-prefixed numbers: 0801 111 1111
        Regex::new(r"\b0\d{9,10}\b").unwrap(),
    ]
});

/// Normalize a phone number candidate to an E.164-style `+`-prefixed string.
///
/// `default_country_code` expands local zero-prefixed numbers (for example
/// `0801...` with code `234` becomes `+234801...`). Candidates outside the
/// 10-15 digit window are rejected.
pub fn normalize(raw: &str, default_country_code: &str) -> Option<String> {
    let mut cleaned = String::with_capacity(raw.len());
    for (i, c) in raw.trim().chars().enumerate() {
        if c.is_ascii_digit() || (c == '+' && i == 0) {
            cleaned.push(c);
        }
    }

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if digits.is_empty() {
        return None;
    }

    // Local format: replace the leading zero with the default country code.
    if !cleaned.starts_with('+') && digits.starts_with('0') && (MIN_DIGITS..=11).contains(&digits.len())
    {
        let expanded = format!("+{}{}", default_country_code, &digits[1..]);
        let expanded_digits = expanded.len() - 1;
        if (MIN_DIGITS..=MAX_DIGITS).contains(&expanded_digits) {
            return Some(expanded);
        }
        return None;
    }

    if (MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
        return Some(format!("+{}", digits));
    }

    None
}

/// Extract every valid phone number from free-form text, in order of
/// appearance, without duplicates.
pub fn extract_from_text(text: &str, default_country_code: &str) -> Vec<String> {
    let mut found = Vec::new();
    for pattern in PHONE_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            if let Some(phone) = normalize(m.as_str(), default_country_code) {
                if !found.contains(&phone) {
                    found.push(phone);
                }
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_international() {
        assert_eq!(
            normalize("+234 801 111 1111", "234").as_deref(),
            Some("+2348011111111")
        );
        assert_eq!(
            normalize("+44-20-7946-0958", "234").as_deref(),
            Some("+442079460958")
        );
    }

    #[test]
    fn test_normalize_local_with_country_code() {
        assert_eq!(
            normalize("08011111111", "234").as_deref(),
            Some("+2348011111111")
        );
        assert_eq!(
            normalize("0801 111 1111", "234").as_deref(),
            Some("+2348011111111")
        );
    }

    #[test]
    fn test_normalize_bare_digits() {
        assert_eq!(
            normalize("2348011111111", "234").as_deref(),
            Some("+2348011111111")
        );
    }

    #[test]
    fn test_normalize_rejects_out_of_range() {
        assert_eq!(normalize("12345", "234"), None);
        assert_eq!(normalize("1234567890123456", "234"), None);
        assert_eq!(normalize("Alice", "234"), None);
        assert_eq!(normalize("", "234"), None);
    }

    #[test]
    fn test_extract_from_text() {
        let text = "call me on +234 801 111 1111 or 08022222222, thanks";
        let phones = extract_from_text(text, "234");
        assert_eq!(phones, vec!["+2348011111111", "+2348022222222"]);
    }

    #[test]
    fn test_extract_deduplicates() {
        let text = "+2348011111111 again +2348011111111";
        assert_eq!(extract_from_text(text, "234").len(), 1);
    }

    #[test]
    fn test_extract_ignores_short_numbers() {
        assert!(extract_from_text("meet at 12:30, room 404", "234").is_empty());
    }
}
