//! Business logic between the HTTP handlers and the store.

pub mod analytics;
pub mod auth;
pub mod email;
pub mod inbox;

pub use auth::{AdminAuthenticator, AdminClaims, AuthError};
pub use email::{ContactNotifier, EmailError, EmailService};
pub use inbox::{Inbox, SubmitError, SubmitReceipt};
