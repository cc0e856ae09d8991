//! Editable portfolio sections.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use portfolio_core::PortfolioSection;

use super::MessageResponse;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Body for `PUT /api/admin/portfolio`.
#[derive(Debug, Deserialize)]
pub struct SectionUpdate {
    #[serde(default)]
    pub section_name: String,
    pub content: serde_json::Value,
}

/// All sections ordered by name.
///
/// GET /api/admin/portfolio
#[instrument(skip_all)]
pub async fn list_sections(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<PortfolioSection>>> {
    Ok(Json(state.store().list_sections().await?))
}

/// Create or replace a section.
///
/// PUT /api/admin/portfolio
#[instrument(skip_all)]
pub async fn upsert_section(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
    body: std::result::Result<Json<SectionUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(update) = body?;
    let section = PortfolioSection::new(&update.section_name, update.content, Utc::now())?;

    state.store().upsert_section(&section).await?;
    tracing::info!(section = %section.section_name, "Portfolio section updated");

    Ok(Json(MessageResponse::ok(format!(
        "Section '{}' updated successfully",
        section.section_name
    ))))
}
