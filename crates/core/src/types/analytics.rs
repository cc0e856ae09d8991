//! Dashboard analytics derived from stored records.
//!
//! Nothing here is persisted. Stores report [`MessageStats`] plus a page
//! view count, and the snapshot is assembled on every request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contact::ContactMessage;

/// Aggregate counts over all contact messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStats {
    /// Number of stored messages.
    pub total: u64,
    /// Number of messages with `read = false`.
    pub unread: u64,
    /// Latest message timestamp, `None` iff `total == 0`.
    pub last_contact: Option<DateTime<Utc>>,
}

impl MessageStats {
    /// Compute stats by scanning messages.
    pub fn from_messages<'a>(messages: impl IntoIterator<Item = &'a ContactMessage>) -> Self {
        messages
            .into_iter()
            .fold(Self::default(), |mut stats, message| {
                stats.total += 1;
                if !message.read {
                    stats.unread += 1;
                }
                stats.last_contact = Some(
                    stats
                        .last_contact
                        .map_or(message.timestamp, |last| last.max(message.timestamp)),
                );
                stats
            })
    }

    /// Number of messages already marked read.
    #[must_use]
    pub const fn read(&self) -> u64 {
        self.total.saturating_sub(self.unread)
    }
}

/// Analytics returned by `GET /api/admin/analytics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub page_views: u64,
    /// Same value as `total_messages`; the dashboard reads both names.
    pub contact_submissions: u64,
    pub total_messages: u64,
    pub unread_messages: u64,
    pub last_contact: Option<DateTime<Utc>>,
}

impl AnalyticsSnapshot {
    /// Combine a page view count with message stats.
    #[must_use]
    pub const fn new(page_views: u64, stats: MessageStats) -> Self {
        Self {
            page_views,
            contact_submissions: stats.total,
            total_messages: stats.total,
            unread_messages: stats.unread,
            last_contact: stats.last_contact,
        }
    }
}
