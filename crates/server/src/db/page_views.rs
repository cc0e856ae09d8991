//! Page view repository.

use sqlx::PgPool;

use portfolio_core::PageView;

use super::{RepositoryError, count_to_u64};

/// Repository for page view database operations.
pub struct PageViewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PageViewRepository<'a> {
    /// Create a new page view repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a page view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, view: &PageView) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO portfolio.page_view (id, page, user_agent, ip_address, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(view.id)
        .bind(&view.page)
        .bind(view.user_agent.as_deref())
        .bind(view.ip_address.as_deref())
        .bind(view.timestamp)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Total number of recorded page views.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM portfolio.page_view")
            .fetch_one(self.pool)
            .await?;

        count_to_u64(count)
    }
}
