//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use leads_core::Tier;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Optional bearer token gating the whole API.
    pub api_token: Option<String>,
    /// Owner id used when a request carries no `X-User-Id` header.
    pub default_owner: String,
    /// Subscription tier applied to owners.
    pub tier: Tier,
    /// Country calling code used to expand local phone numbers.
    pub default_country_code: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `LEADS_ADDR` | Server bind address | `127.0.0.1:8900` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:leads.db?mode=rwc` |
    /// | `LEADS_API_TOKEN` | Bearer token (unset disables auth) | (none) |
    /// | `LEADS_DEFAULT_OWNER` | Fallback owner id | `demo_user` |
    /// | `LEADS_TIER` | Subscription tier | `free` |
    /// | `LEADS_COUNTRY_CODE` | Default country calling code | `234` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("LEADS_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8900".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:leads.db?mode=rwc".to_string());

        let api_token = env::var("LEADS_API_TOKEN").ok().filter(|t| !t.is_empty());

        let default_owner =
            env::var("LEADS_DEFAULT_OWNER").unwrap_or_else(|_| "demo_user".to_string());

        let tier = match env::var("LEADS_TIER") {
            Ok(raw) => Tier::from_str(&raw).map_err(|_| ConfigError::InvalidTier(raw))?,
            Err(_) => Tier::Free,
        };

        let default_country_code =
            env::var("LEADS_COUNTRY_CODE").unwrap_or_else(|_| "234".to_string());
        if default_country_code.is_empty()
            || !default_country_code.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::InvalidCountryCode(default_country_code));
        }

        Ok(Self {
            addr,
            database_url,
            api_token,
            default_owner,
            tier,
            default_country_code,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid LEADS_ADDR format")]
    InvalidAddr,

    #[error("Invalid LEADS_TIER value: {0}")]
    InvalidTier(String),

    #[error("Invalid LEADS_COUNTRY_CODE value: {0}")]
    InvalidCountryCode(String),
}
