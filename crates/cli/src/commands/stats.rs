//! Print the analytics snapshot from the database.
//!
//! Same numbers as `GET /api/admin/analytics`, without going through HTTP.

use thiserror::Error;

use portfolio_server::db::{PgStore, RepositoryError, create_pool};
use portfolio_server::services::analytics;

use super::{DatabaseError, database_url};

/// Errors that can occur while collecting stats.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Query failed: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Query the counts and print them as pretty JSON.
#[allow(clippy::print_stdout)]
pub async fn run() -> Result<(), StatsError> {
    let url = database_url()?;
    let pool = create_pool(&url).await.map_err(DatabaseError::from)?;
    let store = PgStore::new(pool);

    let snapshot = analytics::snapshot(&store).await?;
    tracing::debug!(?snapshot, "Collected analytics");

    let output = serde_json::to_string_pretty(&snapshot)?;
    println!("{output}");
    Ok(())
}
