// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::identity::IdentityError;
use crate::backend::StoreError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every variant maps to one entry of the error taxonomy: bad request,
/// unauthenticated, forbidden, upstream failure, backend unavailable.
/// Client-facing messages are short and stable; upstream detail is logged
/// server-side and never leaks into the response body.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthenticated(String),

    // 403 Forbidden
    Forbidden(String),

    // 500 Internal Server Error
    Upstream(String),

    // 503 Service Unavailable
    Unavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthenticated(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::Upstream(_) => 500,
            ApiError::Unavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthenticated(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Upstream(msg)
            | ApiError::Unavailable(msg) => msg,
        }
    }

    /// Convert to the wire body. Every error surfaces as `{"error": <msg>}`.
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        ApiError::Unavailable(message.into())
    }
}

// Convert backend errors to ApiError
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection(msg) => {
                tracing::error!("store connection error: {}", msg);
                ApiError::unavailable("servicio no disponible")
            }
            StoreError::Sqlx(sqlx_err) => {
                // Log the real error but return a generic message
                tracing::error!("store query error: {}", sqlx_err);
                ApiError::upstream("error interno")
            }
            StoreError::ConfigMissing(var) => {
                tracing::error!("store configuration missing: {}", var);
                ApiError::unavailable("servicio no disponible")
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidToken(msg) => {
                tracing::debug!("rejected credentials: {}", msg);
                ApiError::unauthenticated("sesión inválida")
            }
            IdentityError::UnknownSubject(sub) => {
                tracing::warn!("token subject has no profile: {}", sub);
                ApiError::unauthenticated("sesión inválida")
            }
            IdentityError::Unavailable(msg) => {
                tracing::error!("identity backend unavailable: {}", msg);
                ApiError::unavailable("servicio no disponible")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
