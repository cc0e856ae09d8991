//! Bearer token extractor for admin routes.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::services::auth::{AdminClaims, AuthError};
use crate::state::AppState;

/// Extractor that requires a valid admin bearer token.
///
/// Rejects with 401 and `WWW-Authenticate: Bearer` when the header is
/// missing, uses another scheme, or carries an invalid or expired token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(claims): RequireAdmin) -> impl IntoResponse {
///     format!("token expires at {}", claims.exp)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AdminClaims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::MissingToken)?;
        let claims = state.auth().verify(token)?;
        Ok(Self(claims))
    }
}

/// The token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
