use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

/// Failure taxonomy for every API operation. Each failure is detected at
/// its source and translated immediately into one of these kinds; the
/// `IntoResponse` impl maps them onto the wire envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input; rejected before any storage access.
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
    },

    /// Uniqueness violation; checked before any write.
    #[error("{message}")]
    Conflict {
        code: &'static str,
        message: String,
    },

    /// A referenced entity does not exist.
    #[error("{message}")]
    NotFound {
        code: &'static str,
        message: String,
    },

    /// Bad credentials. A single variant for unknown user and wrong
    /// password, so the response never leaks account existence.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Unexpected storage failure.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ApiError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Validation { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::Conflict { code, message } => (StatusCode::CONFLICT, code, message),
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, code, message),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
            ),
            Self::PasswordHash => {
                error!("Password hashing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            // Full detail is logged server-side; the client sees a
            // generic message.
            Self::Database(db_error) => {
                error!("Request failed with database error: {}", db_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let response =
            ApiError::validation("EMPTY_CART", "Order must contain at least one item")
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_maps_to_conflict_status() {
        let response =
            ApiError::conflict("USERNAME_ALREADY_EXISTS", "Username 'a' is already taken")
                .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn database_error_hides_detail() {
        let response =
            ApiError::Database(DbErr::Custom("connection reset".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
