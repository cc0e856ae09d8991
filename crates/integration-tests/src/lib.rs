//! Integration tests for the portfolio backend.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process API tests (no database or SMTP needed)
//! cargo test -p portfolio-integration-tests
//!
//! # Tests against a running server
//! PORTFOLIO_BASE_URL=http://localhost:8001 ADMIN_PASSWORD=... \
//!     cargo test -p portfolio-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `api` - Full router driven with `tower::ServiceExt::oneshot` over a
//!   [`MemoryStore`]
//! - `live` - HTTP round trips against a deployed server (ignored by default)

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use futures::future::BoxFuture;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use portfolio_core::{ContactMessage, MessageId, MessageStats, PageView, PortfolioSection};
use portfolio_server::config::{AdminAuthConfig, CorsOrigins, PortfolioConfig};
use portfolio_server::db::{MemoryStore, PortfolioStore, RepositoryError};
use portfolio_server::services::email::{ContactNotifier, EmailError};
use portfolio_server::{AppState, build_app};

/// Admin password accepted by [`test_config`].
pub const TEST_PASSWORD: &str = "open-sesame-42";

/// Signing secret used by [`test_config`].
pub const TEST_JWT_SECRET: &str = "q8Vf2LxN7pRz4TmW1cKd9HsJ3bYg6AeU";

/// Configuration for in-process tests: no database, no SMTP, any origin.
#[must_use]
pub fn test_config() -> PortfolioConfig {
    PortfolioConfig {
        database_url: None,
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        admin: AdminAuthConfig {
            password: SecretString::from(TEST_PASSWORD),
            jwt_secret: SecretString::from(TEST_JWT_SECRET),
            token_ttl_minutes: 60,
        },
        cors_origins: CorsOrigins::Any,
        static_dir: None,
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Notifier double that records what it was asked to send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    fail: bool,
    calls: AtomicUsize,
    sent: Mutex<Vec<ContactMessage>>,
}

impl RecordingNotifier {
    /// Notifier whose deliveries always succeed.
    #[must_use]
    pub fn working() -> Self {
        Self::default()
    }

    /// Notifier whose deliveries always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of delivery attempts.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages delivered successfully.
    #[must_use]
    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl ContactNotifier for RecordingNotifier {
    fn notify<'a>(&'a self, message: &'a ContactMessage) -> BoxFuture<'a, Result<(), EmailError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EmailError::InvalidAddress("relay refused".to_string()));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        })
    }
}

/// Store whose every operation fails, counting the attempts.
#[derive(Debug, Default)]
pub struct FailingStore {
    attempts: AtomicUsize,
}

impl FailingStore {
    /// Number of operations attempted so far.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail<T: Send + 'static>(&self) -> BoxFuture<'_, Result<T, RepositoryError>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {
            Err(RepositoryError::Unavailable(
                "connection refused (db.internal:5432)".to_string(),
            ))
        })
    }
}

impl PortfolioStore for FailingStore {
    fn insert_message<'a>(
        &'a self,
        _message: &'a ContactMessage,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        self.fail()
    }

    fn recent_messages(
        &self,
        _limit: u32,
    ) -> BoxFuture<'_, Result<Vec<ContactMessage>, RepositoryError>> {
        self.fail()
    }

    fn mark_message_read(
        &self,
        _id: MessageId,
    ) -> BoxFuture<'_, Result<Option<ContactMessage>, RepositoryError>> {
        self.fail()
    }

    fn message_stats(&self) -> BoxFuture<'_, Result<MessageStats, RepositoryError>> {
        self.fail()
    }

    fn record_page_view<'a>(
        &'a self,
        _view: &'a PageView,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        self.fail()
    }

    fn page_view_count(&self) -> BoxFuture<'_, Result<u64, RepositoryError>> {
        self.fail()
    }

    fn list_sections(&self) -> BoxFuture<'_, Result<Vec<PortfolioSection>, RepositoryError>> {
        self.fail()
    }

    fn upsert_section<'a>(
        &'a self,
        _section: &'a PortfolioSection,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        self.fail()
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        self.fail()
    }
}

/// Buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// `detail` field of an error body.
    #[must_use]
    pub fn detail(&self) -> String {
        self.json()["detail"].as_str().unwrap().to_string()
    }
}

/// The full router over a fresh store, a [`MemoryStore`] unless stated.
pub struct TestApp<S = MemoryStore> {
    router: Router,
    pub store: Arc<S>,
}

impl TestApp {
    /// App without a notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::build(Arc::new(MemoryStore::new()), None)
    }

    /// App with the given notifier.
    #[must_use]
    pub fn with_notifier(notifier: Arc<RecordingNotifier>) -> Self {
        Self::build(Arc::new(MemoryStore::new()), Some(notifier))
    }
}

impl TestApp<FailingStore> {
    /// App whose store rejects every operation.
    #[must_use]
    pub fn with_failing_store(notifier: Arc<RecordingNotifier>) -> Self {
        Self::build(Arc::new(FailingStore::default()), Some(notifier))
    }
}

impl<S: PortfolioStore + 'static> TestApp<S> {
    fn build(store: Arc<S>, notifier: Option<Arc<RecordingNotifier>>) -> Self {
        let state = AppState::with_notifier(
            test_config(),
            Arc::clone(&store) as Arc<dyn PortfolioStore>,
            notifier.map(|n| n as Arc<dyn ContactNotifier>),
        )
        .unwrap();

        Self {
            router: build_app(state),
            store,
        }
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Request with an optional JSON body and bearer token.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    /// Log in with [`TEST_PASSWORD`] and return the access token.
    pub async fn login(&self) -> String {
        let body = serde_json::json!({ "password": TEST_PASSWORD });
        let response = self
            .call(Method::POST, "/api/admin/login", Some(&body), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()["access_token"].as_str().unwrap().to_string()
    }

    /// Submit a valid contact form and return the response.
    pub async fn submit_contact(&self, subject: &str) -> TestResponse {
        let body = serde_json::json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "subject": subject,
            "message": "I enjoyed the analytical engine write-up.",
        });
        self.call(Method::POST, "/api/contact", Some(&body), None)
            .await
    }

    /// Record a page view, optionally naming the page.
    pub async fn track(&self, page: Option<&str>) -> TestResponse {
        let uri = match page {
            Some(page) => format!("/api/track/page-view?page={page}"),
            None => "/api/track/page-view".to_string(),
        };
        self.call(Method::POST, &uri, None, None).await
    }

    /// Create or replace a portfolio section.
    pub async fn put_section(&self, token: &str, body: &Value) -> TestResponse {
        self.call(Method::PUT, "/api/admin/portfolio", Some(body), Some(token))
            .await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
