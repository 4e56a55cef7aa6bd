/// Error handling and the response envelope
///
/// Every endpoint returns the same JSON shape, `{status, message, data?}`,
/// where `status` always equals the HTTP status code. Handlers return
/// `Result<T, ApiError>`; the error side converts to the envelope
/// automatically.
///
/// The taxonomy is a single ordered ladder:
///
/// 1. Validation (422): missing or malformed field
/// 2. Not found (404): task or session absent
/// 3. Conflict (409): duplicate live task title
/// 4. Auth (401): missing/invalid/expired credential
/// 5. Unexpected (500): logged in full, generic message returned

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use taskdesk_shared::auth::{jwt::JwtError, middleware::AuthError, password::PasswordError};
use validator::ValidationErrors;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// The `{status, message, data?}` envelope used by every response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Mirrors the HTTP status code
    pub status: u16,

    /// Human-readable outcome
    pub message: String,

    /// Endpoint payload, omitted when there is none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A 200 envelope with a payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A 200 envelope with no payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed field (422)
    Validation(String),

    /// Missing, invalid, or expired credential (401)
    Unauthorized(String),

    /// Task or session absent (404)
    NotFound(String),

    /// Duplicate live task title (409)
    Conflict(String),

    /// Anything unanticipated (500); logged, never leaked
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(ApiResponse::<()> {
            status: status.as_u16(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found.".to_string()),
            sqlx::Error::Database(db_err) => {
                // The partial unique index on live titles surfaces here when
                // two creates race past the handler's pre-check.
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("title") {
                        return ApiError::Conflict("Task already exists.".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }
                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert auth gate errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DatabaseError(msg) => ApiError::Internal(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Convert credential signing/validation errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => {
                ApiError::Internal(format!("Token creation failed: {}", msg))
            }
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Flattens `validator` errors into one "; "-joined message
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid.", field))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
