//! Admin API route handlers.
//!
//! Everything except `login` requires [`RequireAdmin`].

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
};
use serde::Deserialize;
use tracing::instrument;

use portfolio_core::{AnalyticsSnapshot, ContactMessage, MessageId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::services::analytics;
use crate::services::auth::AccessToken;
use crate::state::AppState;

/// Login request body.
///
/// No `Debug` derive so the password never reaches a log line.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Query string for the message listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Exchange the admin password for a bearer token.
///
/// POST /api/admin/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AccessToken>> {
    let Json(request) = body?;

    match state.auth().login(&request.password) {
        Ok(token) => {
            tracing::info!("Admin login succeeded");
            Ok(Json(token))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Admin login failed");
            Err(e.into())
        }
    }
}

/// Dashboard counts.
///
/// GET /api/admin/analytics
#[instrument(skip_all)]
pub async fn analytics(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsSnapshot>> {
    Ok(Json(analytics::snapshot(state.store()).await?))
}

/// Newest contact messages first.
///
/// GET /api/admin/contact-messages?limit=50
#[instrument(skip_all)]
pub async fn list_messages(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ContactMessage>>> {
    let Query(query) = query?;
    Ok(Json(state.inbox().list(query.limit).await?))
}

/// Mark a message as read. Already-read messages are returned unchanged.
///
/// PUT /api/admin/contact-messages/{id}/read
#[instrument(skip_all, fields(message_id = %id))]
pub async fn mark_read(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContactMessage>> {
    const NOT_FOUND: &str = "Message not found";

    // An id that is not a UUID cannot name a stored message
    let id: MessageId = id.parse().map_err(|_| AppError::NotFound(NOT_FOUND))?;

    state
        .inbox()
        .mark_read(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(NOT_FOUND))
}
