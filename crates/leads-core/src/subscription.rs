//! Subscription tiers and their monthly limits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subscription tier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Basic,
    Pro,
    Business,
}

/// Per-month limits and feature flags for a tier.
///
/// `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub imports_per_month: Option<i64>,
    pub contacts_per_month: Option<i64>,
    pub cloud_backup: bool,
    pub advanced_filtering: bool,
    pub tagging: bool,
    pub analytics: bool,
    pub team_access: bool,
}

impl Tier {
    /// Limits for this tier.
    pub fn limits(self) -> TierLimits {
        match self {
            Tier::Free => TierLimits {
                imports_per_month: Some(2),
                contacts_per_month: Some(50),
                cloud_backup: false,
                advanced_filtering: false,
                tagging: false,
                analytics: false,
                team_access: false,
            },
            Tier::Basic => TierLimits {
                imports_per_month: Some(10),
                contacts_per_month: Some(1000),
                cloud_backup: false,
                advanced_filtering: false,
                tagging: false,
                analytics: false,
                team_access: false,
            },
            Tier::Pro => TierLimits {
                imports_per_month: Some(30),
                contacts_per_month: Some(5000),
                cloud_backup: true,
                advanced_filtering: true,
                tagging: true,
                analytics: false,
                team_access: false,
            },
            Tier::Business => TierLimits {
                imports_per_month: None,
                contacts_per_month: None,
                cloud_backup: true,
                advanced_filtering: true,
                tagging: true,
                analytics: true,
                team_access: true,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Basic => "basic",
            Tier::Pro => "pro",
            Tier::Business => "business",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized tier names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subscription tier: {0}")]
pub struct UnknownTier(pub String);

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "basic" => Ok(Tier::Basic),
            "pro" => Ok(Tier::Pro),
            "business" => Ok(Tier::Business),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_round_trip() {
        for tier in [Tier::Free, Tier::Basic, Tier::Pro, Tier::Business] {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
        assert!("platinum".parse::<Tier>().is_err());
    }

    #[test]
    fn test_free_tier_limits() {
        let limits = Tier::Free.limits();
        assert_eq!(limits.imports_per_month, Some(2));
        assert_eq!(limits.contacts_per_month, Some(50));
        assert!(!limits.tagging);
    }

    #[test]
    fn test_business_tier_is_unlimited() {
        let limits = Tier::Business.limits();
        assert_eq!(limits.imports_per_month, None);
        assert_eq!(limits.contacts_per_month, None);
        assert!(limits.team_access);
    }
}
