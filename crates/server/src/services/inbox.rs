//! Contact message intake and administration.

use chrono::Utc;
use thiserror::Error;

use portfolio_core::{ContactError, ContactMessage, ContactSubmission, MessageId};

use crate::db::{PortfolioStore, RepositoryError};
use crate::services::email::ContactNotifier;

/// Messages returned when the caller does not pass `limit`.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Upper bound on `limit`.
pub const MAX_LIST_LIMIT: u32 = 100;

/// Errors from [`Inbox::submit`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The submission failed validation; nothing was stored.
    #[error(transparent)]
    Invalid(#[from] ContactError),

    /// The message could not be stored.
    #[error("failed to store message: {0}")]
    Storage(#[from] RepositoryError),
}

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub message: ContactMessage,
    /// Whether the owner notification was delivered.
    pub notified: bool,
}

impl SubmitReceipt {
    /// Confirmation text shown to the visitor.
    #[must_use]
    pub const fn confirmation(&self) -> &'static str {
        if self.notified {
            "Thank you for your message! I'll get back to you soon."
        } else {
            "Your message has been received. I'll get back to you soon."
        }
    }
}

/// Contact message operations over a store and an optional notifier.
pub struct Inbox<'a> {
    store: &'a dyn PortfolioStore,
    notifier: Option<&'a dyn ContactNotifier>,
}

impl<'a> Inbox<'a> {
    /// Create a new inbox.
    #[must_use]
    pub const fn new(
        store: &'a dyn PortfolioStore,
        notifier: Option<&'a dyn ContactNotifier>,
    ) -> Self {
        Self { store, notifier }
    }

    /// Validate and store a submission, then notify the owner.
    ///
    /// Notification failures are logged and reflected in
    /// [`SubmitReceipt::notified`], never returned as errors.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Invalid` if validation fails and
    /// `SubmitError::Storage` if the insert fails.
    pub async fn submit(
        &self,
        submission: &ContactSubmission,
    ) -> Result<SubmitReceipt, SubmitError> {
        let message = ContactMessage::from_submission(submission, Utc::now())?;
        self.store.insert_message(&message).await?;

        tracing::info!(message_id = %message.id, "Contact message stored");

        let notified = match self.notifier {
            Some(notifier) => match notifier.notify(&message).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        message_id = %message.id,
                        "Failed to send contact notification"
                    );
                    false
                }
            },
            None => false,
        };

        Ok(SubmitReceipt { message, notified })
    }

    /// Newest messages first, at most `limit` (see [`clamp_limit`]).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<ContactMessage>, RepositoryError> {
        self.store.recent_messages(clamp_limit(limit)).await
    }

    /// Mark a message as read. Returns `None` for an unknown id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn mark_read(
        &self,
        id: MessageId,
    ) -> Result<Option<ContactMessage>, RepositoryError> {
        let updated = self.store.mark_message_read(id).await?;
        if updated.is_some() {
            tracing::info!(message_id = %id, "Contact message marked read");
        }
        Ok(updated)
    }
}

/// Apply the default and clamp to `1..=MAX_LIST_LIMIT`.
#[must_use]
pub fn clamp_limit(limit: Option<i64>) -> u32 {
    limit.map_or(DEFAULT_LIST_LIMIT, |requested| {
        u32::try_from(requested.clamp(1, i64::from(MAX_LIST_LIMIT))).unwrap_or(DEFAULT_LIST_LIMIT)
    })
}
