//! Contact form route handler.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::instrument;

use portfolio_core::ContactSubmission;

use super::MessageResponse;
use crate::error::Result;
use crate::state::AppState;

/// Submit the contact form.
///
/// POST /api/contact
///
/// Stores the message, then emails the site owner when SMTP is configured.
/// The confirmation text tells the visitor whether that email went out.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    body: std::result::Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(submission) = body?;
    let receipt = state.inbox().submit(&submission).await?;

    Ok(Json(MessageResponse::ok(receipt.confirmation())))
}
