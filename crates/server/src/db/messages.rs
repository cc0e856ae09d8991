//! Contact message repository.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate builds
//! without a live database or an offline query cache.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use portfolio_core::{ContactMessage, Email, MessageId, MessageStats};

use super::{RepositoryError, count_to_u64};

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: MessageId,
    name: String,
    email: String,
    subject: String,
    message: String,
    created_at: DateTime<Utc>,
    read: bool,
}

impl TryFrom<MessageRow> for ContactMessage {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            subject: row.subject,
            message: row.message,
            timestamp: row.created_at,
            read: row.read,
        })
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    total: i64,
    unread: i64,
    last_contact: Option<DateTime<Utc>>,
}

/// Repository for contact message database operations.
pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a validated message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, message: &ContactMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO portfolio.contact_message
                (id, name, email, subject, message, created_at, read)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.timestamp)
        .bind(message.read)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Most recent messages first. Ties on `created_at` fall back to
    /// insertion order so the listing is stable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn recent(&self, limit: u32) -> Result<Vec<ContactMessage>, RepositoryError> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r"
            SELECT id, name, email, subject, message, created_at, read
            FROM portfolio.contact_message
            ORDER BY created_at DESC, seq DESC
            LIMIT $1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ContactMessage::try_from).collect()
    }

    /// Mark a message as read in a single statement.
    ///
    /// Returns `None` if no message has this id. Already-read messages are
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn mark_read(
        &self,
        id: MessageId,
    ) -> Result<Option<ContactMessage>, RepositoryError> {
        let row: Option<MessageRow> = sqlx::query_as(
            r"
            UPDATE portfolio.contact_message
            SET read = TRUE
            WHERE id = $1
            RETURNING id, name, email, subject, message, created_at, read
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ContactMessage::try_from).transpose()
    }

    /// Total, unread, and latest timestamp over all messages.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self) -> Result<MessageStats, RepositoryError> {
        let row: StatsRow = sqlx::query_as(
            r"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE NOT read) AS unread,
                   MAX(created_at) AS last_contact
            FROM portfolio.contact_message
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(MessageStats {
            total: count_to_u64(row.total)?,
            unread: count_to_u64(row.unread)?,
            last_contact: row.last_contact,
        })
    }
}
