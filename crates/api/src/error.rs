//! API error types and their JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use leads_core::VcfError;
use parser::ParseError;
use thiserror::Error;

/// Errors surfaced by the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request input.
    #[error("{0}")]
    Validation(String),

    /// Unknown resource.
    #[error("{0}")]
    NotFound(String),

    /// Resource owned by a different user.
    #[error("{0}")]
    Forbidden(String),

    /// Monthly subscription limit reached.
    #[error("{0}")]
    QuotaExceeded(String),

    /// Missing or wrong bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Database failure.
    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DatabaseError::Forbidden { .. } => ApiError::Forbidden(err.to_string()),
            DatabaseError::QuotaExceeded { .. } => ApiError::QuotaExceeded(err.to_string()),
            other => ApiError::Database(other),
        }
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        // Oversized inputs are the only fatal parse condition.
        ApiError::Validation(err.to_string())
    }
}

impl From<VcfError> for ApiError {
    fn from(err: VcfError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::QuotaExceeded(_) => "quota_exceeded",
            ApiError::Unauthorized => "auth_error",
            ApiError::Database(_) => "database_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Database(err) = &self {
            tracing::error!("Database error: {}", err);
        }

        let body = serde_json::json!({
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        });

        (self.status(), Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_errors_map_to_api_kinds() {
        let err: ApiError = DatabaseError::NotFound {
            entity: "Lead",
            id: "x".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), "not_found");

        let err: ApiError = DatabaseError::Forbidden {
            entity: "Lead",
            id: "x".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let err: ApiError = DatabaseError::QuotaExceeded {
            resource: "imports",
            limit: 2,
        }
        .into();
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.kind(), "quota_exceeded");
    }

    #[test]
    fn test_parse_errors_are_validation_errors() {
        let err: ApiError = ParseError::TooManyLines {
            lines: 200_000,
            max: 100_000,
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "validation_error");
    }
}
