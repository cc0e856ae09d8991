//! Admin authentication error types.

use thiserror::Error;

/// Errors that can occur during admin authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The submitted password does not match.
    #[error("invalid admin credentials")]
    InvalidCredentials,

    /// No bearer token on the request.
    #[error("missing bearer token")]
    MissingToken,

    /// Token is malformed, forged, or carries the wrong subject.
    #[error("invalid token")]
    InvalidToken,

    /// Token signature is valid but `exp` has passed.
    #[error("token expired")]
    TokenExpired,

    /// Token could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The signing secret cannot be used as an HMAC key.
    #[error("invalid signing key")]
    InvalidKey,
}

impl AuthError {
    /// Whether this error is the client's fault (401) rather than ours.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::MissingToken | Self::InvalidToken | Self::TokenExpired
        )
    }
}
