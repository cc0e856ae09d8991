//! Storage for contact messages, page views, and portfolio sections.
//!
//! # Schema: `portfolio`
//!
//! ## Tables
//!
//! - `contact_message` - Contact form submissions with a `read` flag
//! - `page_view` - One row per tracked page view
//! - `section` - Editable portfolio content keyed by `section_name`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p portfolio-cli -- migrate
//! ```
//!
//! Handlers never talk to sqlx directly. They go through the
//! [`PortfolioStore`] trait so the router can run against [`MemoryStore`]
//! when no database is configured, and in tests.

pub mod memory;
pub mod messages;
pub mod page_views;
pub mod sections;

use std::time::Duration;

use futures::future::BoxFuture;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use portfolio_core::{ContactMessage, MessageId, MessageStats, PageView, PortfolioSection};

pub use memory::MemoryStore;
pub use messages::MessageRepository;
pub use page_views::PageViewRepository;
pub use sections::SectionRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The store refused the operation (used by test doubles).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence operations needed by the HTTP layer.
///
/// Methods return boxed futures so the trait stays object safe and can be
/// shared as `Arc<dyn PortfolioStore>`.
pub trait PortfolioStore: Send + Sync {
    /// Persist a newly created message.
    fn insert_message<'a>(
        &'a self,
        message: &'a ContactMessage,
    ) -> BoxFuture<'a, Result<(), RepositoryError>>;

    /// Up to `limit` messages, newest first.
    fn recent_messages(&self, limit: u32)
    -> BoxFuture<'_, Result<Vec<ContactMessage>, RepositoryError>>;

    /// Set `read = true` and return the updated message, or `None` if no
    /// message has this id.
    fn mark_message_read(
        &self,
        id: MessageId,
    ) -> BoxFuture<'_, Result<Option<ContactMessage>, RepositoryError>>;

    /// Totals over all stored messages.
    fn message_stats(&self) -> BoxFuture<'_, Result<MessageStats, RepositoryError>>;

    /// Persist one page view.
    fn record_page_view<'a>(
        &'a self,
        view: &'a PageView,
    ) -> BoxFuture<'a, Result<(), RepositoryError>>;

    /// Number of recorded page views.
    fn page_view_count(&self) -> BoxFuture<'_, Result<u64, RepositoryError>>;

    /// All sections ordered by name.
    fn list_sections(&self) -> BoxFuture<'_, Result<Vec<PortfolioSection>, RepositoryError>>;

    /// Create or replace a section by name.
    fn upsert_section<'a>(
        &'a self,
        section: &'a PortfolioSection,
    ) -> BoxFuture<'a, Result<(), RepositoryError>>;

    /// Cheap connectivity check for the readiness probe.
    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// [`PortfolioStore`] backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PortfolioStore for PgStore {
    fn insert_message<'a>(
        &'a self,
        message: &'a ContactMessage,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(async move { MessageRepository::new(&self.pool).insert(message).await })
    }

    fn recent_messages(
        &self,
        limit: u32,
    ) -> BoxFuture<'_, Result<Vec<ContactMessage>, RepositoryError>> {
        Box::pin(async move { MessageRepository::new(&self.pool).recent(limit).await })
    }

    fn mark_message_read(
        &self,
        id: MessageId,
    ) -> BoxFuture<'_, Result<Option<ContactMessage>, RepositoryError>> {
        Box::pin(async move { MessageRepository::new(&self.pool).mark_read(id).await })
    }

    fn message_stats(&self) -> BoxFuture<'_, Result<MessageStats, RepositoryError>> {
        Box::pin(async move { MessageRepository::new(&self.pool).stats().await })
    }

    fn record_page_view<'a>(
        &'a self,
        view: &'a PageView,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(async move { PageViewRepository::new(&self.pool).insert(view).await })
    }

    fn page_view_count(&self) -> BoxFuture<'_, Result<u64, RepositoryError>> {
        Box::pin(async move { PageViewRepository::new(&self.pool).count().await })
    }

    fn list_sections(&self) -> BoxFuture<'_, Result<Vec<PortfolioSection>, RepositoryError>> {
        Box::pin(async move { SectionRepository::new(&self.pool).list().await })
    }

    fn upsert_section<'a>(
        &'a self,
        section: &'a PortfolioSection,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(async move { SectionRepository::new(&self.pool).upsert(section).await })
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        Box::pin(async move {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
    }
}

/// Convert a non-negative `COUNT(*)` result to `u64`.
pub(crate) fn count_to_u64(count: i64) -> Result<u64, RepositoryError> {
    u64::try_from(count)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative count: {count}")))
}
