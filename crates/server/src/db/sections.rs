//! Portfolio section repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use portfolio_core::PortfolioSection;

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct SectionRow {
    section_name: String,
    content: Json<serde_json::Value>,
    updated_at: DateTime<Utc>,
}

impl From<SectionRow> for PortfolioSection {
    fn from(row: SectionRow) -> Self {
        Self {
            section_name: row.section_name,
            content: row.content.0,
            last_updated: row.updated_at,
        }
    }
}

/// Repository for portfolio section database operations.
pub struct SectionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SectionRepository<'a> {
    /// Create a new section repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All sections ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<PortfolioSection>, RepositoryError> {
        let rows: Vec<SectionRow> = sqlx::query_as(
            r"
            SELECT section_name, content, updated_at
            FROM portfolio.section
            ORDER BY section_name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(PortfolioSection::from).collect())
    }

    /// Insert a section or replace the content of an existing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(&self, section: &PortfolioSection) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO portfolio.section (section_name, content, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (section_name)
            DO UPDATE SET content = EXCLUDED.content, updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(&section.section_name)
        .bind(Json(&section.content))
        .bind(section.last_updated)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
