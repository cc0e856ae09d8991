//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every error body has the shape
//! `{"detail": "..."}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use portfolio_core::{ContactError, SectionError};

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::inbox::SubmitError;

/// Detail returned for storage failures unless a route picks its own.
const STORAGE_DETAIL: &str = "Internal server error";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed domain validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request could not be parsed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(&'static str),

    /// Store operation failed.
    #[error("Storage error: {source}")]
    Storage {
        #[source]
        source: RepositoryError,
        /// Message shown to the client.
        detail: &'static str,
    },
}

impl AppError {
    /// Storage failure with a route-specific client message.
    #[must_use]
    pub const fn storage(source: RepositoryError, detail: &'static str) -> Self {
        Self::Storage { source, detail }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) if err.is_unauthorized() => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Auth(_) | Self::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client.
    fn detail(&self) -> String {
        match self {
            Self::Validation(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Auth(AuthError::InvalidCredentials) => "Invalid admin credentials".to_string(),
            Self::Auth(AuthError::MissingToken) => "Not authenticated".to_string(),
            Self::Auth(AuthError::TokenExpired) => "Token has expired".to_string(),
            Self::Auth(AuthError::InvalidToken) => "Could not validate credentials".to_string(),
            Self::NotFound(what) => (*what).to_string(),
            Self::Storage { detail, .. } => (*detail).to_string(),
            // Don't expose internal error details to clients
            Self::Auth(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let mut response = (status, Json(json!({ "detail": self.detail() }))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<RepositoryError> for AppError {
    fn from(source: RepositoryError) -> Self {
        Self::storage(source, STORAGE_DETAIL)
    }
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<SectionError> for AppError {
    fn from(err: SectionError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(invalid) => invalid.into(),
            SubmitError::Storage(source) => {
                Self::storage(source, "Failed to send message. Please try again later.")
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON of the wrong shape
            JsonRejection::JsonDataError(err) => Self::Validation(err.body_text()),
            other => Self::BadRequest(other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
