//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/                                  - API banner
//!
//! # Public
//! POST /api/contact                           - Submit the contact form
//! POST /api/track/page-view?page=             - Record a page view
//!
//! # Admin
//! POST /api/admin/login                       - Exchange password for token
//! GET  /api/admin/analytics                   - Dashboard counts (bearer)
//! GET  /api/admin/contact-messages?limit=     - Newest messages (bearer)
//! PUT  /api/admin/contact-messages/{id}/read  - Mark read (bearer)
//! GET  /api/admin/portfolio                   - List sections (bearer)
//! PUT  /api/admin/portfolio                   - Upsert a section (bearer)
//! ```

pub mod admin;
pub mod contact;
pub mod portfolio;
pub mod tracking;

use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Generic `{success, message}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    /// Successful acknowledgement with `message`.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// API banner body.
#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
}

/// GET /api/
async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Portfolio API is running",
    })
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/analytics", get(admin::analytics))
        .route("/contact-messages", get(admin::list_messages))
        .route("/contact-messages/{id}/read", put(admin::mark_read))
        .route(
            "/portfolio",
            get(portfolio::list_sections).put(portfolio::upsert_section),
        )
}

/// Create all `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(banner))
        .route("/api/", get(banner))
        .route("/api/contact", post(contact::submit))
        .route("/api/track/page-view", post(tracking::page_view))
        .nest("/api/admin", admin_routes())
}
