//! Portfolio backend library.
//!
//! The contact form intake and admin dashboard API as a library, so the
//! router can be driven in-process by tests and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use app::build_app;
pub use config::PortfolioConfig;
pub use state::AppState;
