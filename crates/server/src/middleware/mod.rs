//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (new hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. CORS
//!
//! Admin authentication is an extractor ([`RequireAdmin`]) rather than a
//! layer, so public and admin routes share one router.

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{RequireAdmin, bearer_token};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
