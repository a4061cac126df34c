//! Bearer-token gate and owner resolution.
//!
//! Every store operation is scoped to an owner id. The id comes from the
//! `X-User-Id` header when present, otherwise from configuration; an optional
//! shared bearer token gates the whole surface.

use axum::http::HeaderMap;

use crate::config::Config;
use crate::error::ApiError;

/// Header naming the owner a request acts for.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Check the bearer token, if one is configured.
pub fn authorize(config: &Config, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = config.api_token.as_deref() else {
        return Ok(());
    };

    let Some(value) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Err(ApiError::Unauthorized);
    };

    let Ok(value) = value.to_str() else {
        return Err(ApiError::Unauthorized);
    };

    let token = value.strip_prefix("Bearer ").unwrap_or(value);
    if token != expected {
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}

/// Resolve the owner id for a request.
pub fn resolve_owner(config: &Config, headers: &HeaderMap) -> String {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(&config.default_owner)
        .to_string()
}
