//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::PortfolioConfig;
use crate::db::PortfolioStore;
use crate::services::auth::{AdminAuthenticator, AuthError};
use crate::services::email::{ContactNotifier, EmailError, EmailService};
use crate::services::inbox::Inbox;

/// Error building application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("admin auth: {0}")]
    Auth(#[from] AuthError),
    #[error("email: {0}")]
    Email(#[from] EmailError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store and notifier are
/// trait objects so tests can swap in in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortfolioConfig,
    store: Arc<dyn PortfolioStore>,
    auth: AdminAuthenticator,
    notifier: Option<Arc<dyn ContactNotifier>>,
}

impl AppState {
    /// Create application state, building the SMTP notifier when
    /// `config.email` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing key or SMTP settings are unusable.
    pub fn new(
        config: PortfolioConfig,
        store: Arc<dyn PortfolioStore>,
    ) -> Result<Self, StateError> {
        let notifier = match &config.email {
            Some(email) => Some(Arc::new(EmailService::new(email)?) as Arc<dyn ContactNotifier>),
            None => None,
        };
        Self::with_notifier(config, store, notifier)
    }

    /// Create application state with an explicit notifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing key is unusable.
    pub fn with_notifier(
        config: PortfolioConfig,
        store: Arc<dyn PortfolioStore>,
        notifier: Option<Arc<dyn ContactNotifier>>,
    ) -> Result<Self, StateError> {
        let auth = AdminAuthenticator::new(&config.admin)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
                notifier,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &PortfolioConfig {
        &self.inner.config
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &dyn PortfolioStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the admin authenticator.
    #[must_use]
    pub fn auth(&self) -> &AdminAuthenticator {
        &self.inner.auth
    }

    /// Contact message operations bound to this state's store and notifier.
    #[must_use]
    pub fn inbox(&self) -> Inbox<'_> {
        Inbox::new(self.store(), self.inner.notifier.as_deref())
    }
}
