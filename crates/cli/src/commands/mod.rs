//! CLI subcommands.

pub mod migrate;
pub mod secret;
pub mod stats;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by commands that talk to the database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Neither database URL variable is set.
    #[error("Missing environment variable: PORTFOLIO_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),
}

/// Database URL from `PORTFOLIO_DATABASE_URL`, falling back to `DATABASE_URL`.
///
/// Loads `.env` first.
pub fn database_url() -> Result<SecretString, DatabaseError> {
    dotenvy::dotenv().ok();

    std::env::var("PORTFOLIO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.trim().is_empty())
        .map(SecretString::from)
        .ok_or(DatabaseError::MissingDatabaseUrl)
}
