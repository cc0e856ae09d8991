//! In-process store used when no database is configured, and in tests.
//!
//! Data lives only as long as the process.

use std::collections::BTreeMap;

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use portfolio_core::{ContactMessage, MessageId, MessageStats, PageView, PortfolioSection};

use super::{PortfolioStore, RepositoryError};

#[derive(Default)]
struct Inner {
    /// Insertion order.
    messages: Vec<ContactMessage>,
    page_views: Vec<PageView>,
    sections: BTreeMap<String, PortfolioSection>,
}

/// [`PortfolioStore`] kept in memory behind a `tokio` `RwLock`.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PortfolioStore for MemoryStore {
    fn insert_message<'a>(
        &'a self,
        message: &'a ContactMessage,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(async move {
            self.inner.write().await.messages.push(message.clone());
            Ok(())
        })
    }

    fn recent_messages(
        &self,
        limit: u32,
    ) -> BoxFuture<'_, Result<Vec<ContactMessage>, RepositoryError>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            // Newest insert first, then a stable sort keeps that order for
            // equal timestamps.
            let mut messages: Vec<ContactMessage> =
                inner.messages.iter().rev().cloned().collect();
            messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            messages.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            Ok(messages)
        })
    }

    fn mark_message_read(
        &self,
        id: MessageId,
    ) -> BoxFuture<'_, Result<Option<ContactMessage>, RepositoryError>> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            Ok(inner
                .messages
                .iter_mut()
                .find(|message| message.id == id)
                .map(|message| {
                    message.mark_read();
                    message.clone()
                }))
        })
    }

    fn message_stats(&self) -> BoxFuture<'_, Result<MessageStats, RepositoryError>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            Ok(MessageStats::from_messages(&inner.messages))
        })
    }

    fn record_page_view<'a>(
        &'a self,
        view: &'a PageView,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(async move {
            self.inner.write().await.page_views.push(view.clone());
            Ok(())
        })
    }

    fn page_view_count(&self) -> BoxFuture<'_, Result<u64, RepositoryError>> {
        Box::pin(async move {
            let count = self.inner.read().await.page_views.len();
            Ok(u64::try_from(count).unwrap_or(u64::MAX))
        })
    }

    fn list_sections(&self) -> BoxFuture<'_, Result<Vec<PortfolioSection>, RepositoryError>> {
        Box::pin(async move { Ok(self.inner.read().await.sections.values().cloned().collect()) })
    }

    fn upsert_section<'a>(
        &'a self,
        section: &'a PortfolioSection,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(async move {
            self.inner
                .write()
                .await
                .sections
                .insert(section.section_name.clone(), section.clone());
            Ok(())
        })
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        Box::pin(async { Ok(()) })
    }
}
