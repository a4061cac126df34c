//! vCard 3.0 serialization for exported leads.

use thiserror::Error;

/// One contact to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcardEntry {
    /// Display name; falls back to the phone number when absent.
    pub display_name: Option<String>,
    /// Normalized phone number.
    pub phone_number: String,
}

/// Errors from vCard export.
#[derive(Debug, Error)]
pub enum VcfError {
    /// Nothing to export; an empty file must not look like success.
    #[error("no leads selected for export")]
    EmptySelection,
}

/// Render a set of entries as vCard 3.0 text.
///
/// Emits one `BEGIN:VCARD`..`END:VCARD` block per entry with `N`, `FN` and
/// `TEL` fields. Returns [`VcfError::EmptySelection`] for an empty set.
pub fn render(entries: &[VcardEntry]) -> Result<String, VcfError> {
    if entries.is_empty() {
        return Err(VcfError::EmptySelection);
    }

    let mut out = String::new();
    for entry in entries {
        let name = entry
            .display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&entry.phone_number);
        let name = escape_value(name);

        out.push_str("BEGIN:VCARD\n");
        out.push_str("VERSION:3.0\n");
        out.push_str(&format!("N:{};;;;\n", name));
        out.push_str(&format!("FN:{}\n", name));
        out.push_str(&format!("TEL;TYPE=CELL:{}\n", entry.phone_number));
        out.push_str("END:VCARD\n");
    }

    Ok(out)
}

/// Escape the characters vCard reserves inside text values.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}
