use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for reservation operations
#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Reservation not found: {0}")]
    NotFound(String),

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("Employee {0} is not enrolled in the advance meal program")]
    NotEligible(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Access token has expired")]
    TokenExpired,
}

impl From<sqlx::Error> for ReservationError {
    fn from(err: sqlx::Error) -> Self {
        ReservationError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for ReservationError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ReservationError::DatabaseError(msg) => {
                tracing::error!("Database error in reservations: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ReservationError::NotFound(reference) => (
                StatusCode::NOT_FOUND,
                format!("Reservation {} not found", reference),
            ),
            ReservationError::EmployeeNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Employee {} not found", id),
            ),
            ReservationError::NotEligible(id) => (
                StatusCode::FORBIDDEN,
                format!("Employee {} is not enrolled in the advance meal program", id),
            ),
            ReservationError::InvalidTransition(msg) => (StatusCode::BAD_REQUEST, msg),
            ReservationError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ReservationError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            ReservationError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "Access token has expired".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
