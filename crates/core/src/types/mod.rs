//! Core types for the portfolio backend.
//!
//! This module provides type-safe wrappers for the domain concepts.

pub mod analytics;
pub mod contact;
pub mod email;
pub mod id;
pub mod page_view;
pub mod section;

pub use analytics::{AnalyticsSnapshot, MessageStats};
pub use contact::{ContactError, ContactMessage, ContactSubmission, Field};
pub use email::{Email, EmailError};
pub use id::*;
pub use page_view::PageView;
pub use section::{PortfolioSection, SectionError};
