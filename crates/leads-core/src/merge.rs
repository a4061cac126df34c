//! Display-name merge rule shared by in-file and cross-import dedup.

/// Check whether a display name is really just a phone number.
///
/// WhatsApp shows the raw number for senders that are not in the exporter's
/// address book, so a "name" that is mostly digits carries no information
/// beyond the number itself.
pub fn is_phone_shaped(name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }
    if name.starts_with('+') {
        return true;
    }

    let digits = name.chars().filter(|c| c.is_ascii_digit()).count();
    digits >= 8 && digits * 10 > name.chars().count() * 6
}

/// Merge an incoming display name into an existing one.
///
/// A later sighting overwrites the stored name only when the stored name is
/// empty or indistinguishable from the phone number itself. A real name is
/// never replaced.
pub fn merge_display_name(
    existing: Option<&str>,
    incoming: Option<&str>,
    phone_number: &str,
) -> Option<String> {
    let keep_existing = existing.is_some_and(|name| {
        let name = name.trim();
        !name.is_empty() && !is_phone_shaped(name) && !same_digits(name, phone_number)
    });
    if keep_existing {
        return existing.map(str::to_string);
    }

    match incoming.map(str::trim) {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => existing
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
    }
}

/// Compare two strings by their digit content only.
fn same_digits(a: &str, b: &str) -> bool {
    let digits = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();
    let (da, db) = (digits(a), digits(b));
    !da.is_empty() && da == db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_phone_shaped() {
        assert!(is_phone_shaped("+2348011111111"));
        assert!(is_phone_shaped("0801 111 1111"));
        assert!(is_phone_shaped("234-801-111-1111"));
        assert!(!is_phone_shaped("Alice"));
        assert!(!is_phone_shaped("Agent 47"));
        assert!(!is_phone_shaped(""));
    }

    #[test]
    fn test_real_name_is_never_replaced() {
        let merged = merge_display_name(Some("Alice"), Some("+2348011111111"), "+2348011111111");
        assert_eq!(merged.as_deref(), Some("Alice"));

        let merged = merge_display_name(Some("Alice"), Some("Bob"), "+2348011111111");
        assert_eq!(merged.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_empty_name_is_filled() {
        let merged = merge_display_name(None, Some("Alice"), "+2348011111111");
        assert_eq!(merged.as_deref(), Some("Alice"));

        let merged = merge_display_name(Some(""), Some("Alice"), "+2348011111111");
        assert_eq!(merged.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_phone_shaped_name_is_upgraded() {
        let merged = merge_display_name(Some("+2348011111111"), Some("Alice"), "+2348011111111");
        assert_eq!(merged.as_deref(), Some("Alice"));

        // Same digits with different punctuation still count as the number.
        let merged = merge_display_name(Some("0801 111 1111"), Some("Alice"), "+8011111111");
        assert_eq!(merged.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_nothing_incoming_keeps_existing() {
        let merged = merge_display_name(Some("+2348011111111"), None, "+2348011111111");
        assert_eq!(merged.as_deref(), Some("+2348011111111"));

        assert_eq!(merge_display_name(None, None, "+2348011111111"), None);
    }
}
