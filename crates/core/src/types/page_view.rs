//! Page view records.
//!
//! A page view is recorded each time the frontend calls the tracking
//! endpoint. The dashboard only ever reports the total count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::PageViewId;

/// A single recorded page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub id: PageViewId,
    pub page: String,
    pub timestamp: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl PageView {
    /// Page name used when the caller does not supply one.
    pub const DEFAULT_PAGE: &'static str = "home";

    /// Maximum stored length of the page name, in characters.
    pub const MAX_PAGE_CHARS: usize = 100;

    /// Build a page view, normalizing the page name.
    ///
    /// Blank names fall back to [`Self::DEFAULT_PAGE`]; long names are cut
    /// to [`Self::MAX_PAGE_CHARS`] characters.
    #[must_use]
    pub fn new(
        page: Option<&str>,
        user_agent: Option<String>,
        ip_address: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let page = page
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(Self::DEFAULT_PAGE)
            .chars()
            .take(Self::MAX_PAGE_CHARS)
            .collect();

        Self {
            id: PageViewId::new(),
            page,
            timestamp,
            user_agent,
            ip_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page() {
        assert_eq!(PageView::new(None, None, None, Utc::now()).page, "home");
        assert_eq!(PageView::new(Some("  "), None, None, Utc::now()).page, "home");
    }

    #[test]
    fn test_page_is_trimmed_and_truncated() {
        let view = PageView::new(Some(" projects "), None, None, Utc::now());
        assert_eq!(view.page, "projects");

        let long = "p".repeat(150);
        let view = PageView::new(Some(&long), None, None, Utc::now());
        assert_eq!(view.page.chars().count(), PageView::MAX_PAGE_CHARS);
    }
}
