//! Page view tracking and the admin analytics snapshot.

use chrono::Utc;

use portfolio_core::{AnalyticsSnapshot, PageView};

use crate::db::{PortfolioStore, RepositoryError};

/// Record one page view.
///
/// # Errors
///
/// Returns `RepositoryError` if the store fails.
pub async fn track_page_view(
    store: &dyn PortfolioStore,
    page: Option<&str>,
    user_agent: Option<String>,
    ip_address: Option<String>,
) -> Result<PageView, RepositoryError> {
    let view = PageView::new(page, user_agent, ip_address, Utc::now());
    store.record_page_view(&view).await?;
    tracing::debug!(page = %view.page, "Page view recorded");
    Ok(view)
}

/// Build the dashboard snapshot from the current store contents.
///
/// # Errors
///
/// Returns `RepositoryError` if either count fails.
pub async fn snapshot(store: &dyn PortfolioStore) -> Result<AnalyticsSnapshot, RepositoryError> {
    let (page_views, stats) = tokio::try_join!(store.page_view_count(), store.message_stats())?;
    Ok(AnalyticsSnapshot::new(page_views, stats))
}
