use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Failures surfaced by the identity core.
///
/// Business code only ever deals in these variants; the HTTP layer maps each
/// one onto a status class via [`IntoResponse`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("email already exists")]
    DuplicateEmail,

    #[error("user not found")]
    NotFound,

    /// Credential hashing or verification failed below the password layer.
    #[error("password hashing failed")]
    Hashing(#[source] anyhow::Error),

    /// Signature, structure or expiry check failed. Carries no detail about
    /// which check it was.
    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token signing failed")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    /// Any underlying storage failure not otherwise classified.
    #[error("storage error")]
    Repository(#[source] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::DuplicateEmail => StatusCode::CONFLICT,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::InvalidToken => StatusCode::UNAUTHORIZED,
            ServiceError::Hashing(_)
            | ServiceError::TokenSigning(_)
            | ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        // Display strings are generic on purpose; sources never reach the
        // client.
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
