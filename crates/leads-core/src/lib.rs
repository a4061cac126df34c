//! Core types and rules for the lead manager.
//!
//! This crate holds the pieces shared between the parser, the store, and the
//! HTTP surface: the transient [`ParsedLead`] extraction result, the
//! display-name merge rule used by every dedup path, subscription tiers with
//! their monthly limits, and the vCard serializer.

pub mod merge;
pub mod subscription;
pub mod vcf;

pub use merge::{is_phone_shaped, merge_display_name};
pub use subscription::{Tier, TierLimits};
pub use vcf::{VcardEntry, VcfError};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A candidate lead extracted from a single chat export.
///
/// Exists only for the duration of one parse call; the store folds these into
/// persistent lead records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLead {
    /// Normalized phone number (E.164-style, `+` prefixed).
    pub phone_number: String,
    /// Display name from the export, if the sender had one.
    pub display_name: Option<String>,
    /// Timestamp of the first message this number appeared in.
    pub first_seen: Option<NaiveDateTime>,
}

impl ParsedLead {
    /// Create a parsed lead with just a phone number.
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            display_name: None,
            first_seen: None,
        }
    }
}
