//! Portfolio Core - Shared domain types.
//!
//! This crate provides the types used across the portfolio components:
//! - `server` - JSON API for the contact form and the admin dashboard
//! - `cli` - Command-line tools for migrations and maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Everything here can be unit tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - IDs, emails, contact messages, page views, sections, analytics

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
