//! In-process API tests.
//!
//! Each test builds the full router over a fresh `MemoryStore` and drives it
//! with `tower::ServiceExt::oneshot`. No database, SMTP relay, or network.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use portfolio_integration_tests::{RecordingNotifier, TestApp, test_config};
use portfolio_server::db::PortfolioStore;
use portfolio_server::services::auth::AdminAuthenticator;

const RECEIVED: &str = "Your message has been received. I'll get back to you soon.";
const THANKS: &str = "Thank you for your message! I'll get back to you soon.";

async fn list(app: &TestApp, token: &str, limit: u32) -> Vec<Value> {
    let response = app
        .call(
            Method::GET,
            &format!("/api/admin/contact-messages?limit={limit}"),
            None,
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.json().as_array().unwrap().clone()
}

async fn analytics(app: &TestApp, token: &str) -> Value {
    let response = app
        .call(Method::GET, "/api/admin/analytics", None, Some(token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.json()
}

// ============================================================================
// Banner & Health
// ============================================================================

#[tokio::test]
async fn test_banner() {
    let app = TestApp::new();
    for uri in ["/api", "/api/"] {
        let response = app.call(Method::GET, uri, None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json()["message"], "Portfolio API is running");
    }
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = TestApp::new();

    let response = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"ok");

    let response = app.call(Method::GET, "/health/ready", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let app = TestApp::new();
    let response = app.call(Method::GET, "/api/nope", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.detail(), "Not Found");
}

#[tokio::test]
async fn test_every_response_has_request_id_and_security_headers() {
    let app = TestApp::new();
    let response = app.call(Method::GET, "/api/", None, None).await;

    assert!(response.headers.contains_key("x-request-id"));
    assert_eq!(response.headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn test_incoming_request_id_is_echoed() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.headers.get("x-request-id").unwrap(), "trace-me-123");
}

// ============================================================================
// Contact Intake
// ============================================================================

#[tokio::test]
async fn test_submit_creates_one_unread_message() {
    let app = TestApp::new();

    let response = app.submit_contact("Hello").await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], RECEIVED);

    let token = app.login().await;
    let messages = list(&app, &token, 10).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["subject"], "Hello");
    assert_eq!(messages[0]["email"], "ada@example.com");
    assert_eq!(messages[0]["read"], false);
}

#[tokio::test]
async fn test_submit_trims_fields() {
    let app = TestApp::new();
    let body = json!({
        "name": "  Grace  ",
        "email": " grace@example.com ",
        "subject": " Compilers ",
        "message": "  Hi  ",
    });
    let response = app.call(Method::POST, "/api/contact", Some(&body), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let stored = app.store.recent_messages(1).await.unwrap();
    assert_eq!(stored[0].name, "Grace");
    assert_eq!(stored[0].subject, "Compilers");
    assert_eq!(stored[0].message, "Hi");
    assert_eq!(stored[0].email.as_str(), "grace@example.com");
}

#[tokio::test]
async fn test_empty_fields_are_rejected_and_store_nothing() {
    let app = TestApp::new();

    for field in ["name", "email", "subject", "message"] {
        let mut body = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Hello",
            "message": "Hi",
        });
        body[field] = json!("   ");

        let response = app.call(Method::POST, "/api/contact", Some(&body), None).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "{field}");
        assert_eq!(response.detail(), format!("{field} is required"));
    }

    assert_eq!(app.store.message_stats().await.unwrap().total, 0);
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let app = TestApp::new();
    let body = json!({ "name": "Ada", "email": "ada@example.com", "subject": "Hello" });

    let response = app.call(Method::POST, "/api/contact", Some(&body), None).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.store.message_stats().await.unwrap().total, 0);
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let app = TestApp::new();
    let body = json!({
        "name": "Ada",
        "email": "not-an-email",
        "subject": "Hello",
        "message": "Hi",
    });

    let response = app.call(Method::POST, "/api/contact", Some(&body), None).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.detail().contains("email"));
}

#[tokio::test]
async fn test_overlong_subject_is_rejected() {
    let app = TestApp::new();
    let body = json!({
        "name": "Ada",
        "email": "ada@example.com",
        "subject": "s".repeat(201),
        "message": "Hi",
    });

    let response = app.call(Method::POST, "/api/contact", Some(&body), None).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.store.message_stats().await.unwrap().total, 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.detail().is_empty());
}

#[tokio::test]
async fn test_submit_notifies_owner() {
    let notifier = Arc::new(RecordingNotifier::working());
    let app = TestApp::with_notifier(Arc::clone(&notifier));

    let response = app.submit_contact("Project inquiry").await;
    assert_eq!(response.json()["message"], THANKS);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Project inquiry");
}

#[tokio::test]
async fn test_notification_failure_still_succeeds() {
    let notifier = Arc::new(RecordingNotifier::failing());
    let app = TestApp::with_notifier(Arc::clone(&notifier));

    let response = app.submit_contact("Hello").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], RECEIVED);
    assert_eq!(notifier.calls(), 1);
    assert_eq!(app.store.message_stats().await.unwrap().total, 1);
}

#[tokio::test]
async fn test_submit_does_not_count_as_page_view() {
    let app = TestApp::new();
    app.submit_contact("Hello").await;
    assert_eq!(app.store.page_view_count().await.unwrap(), 0);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = TestApp::new();
    let body = json!({ "password": portfolio_integration_tests::TEST_PASSWORD });

    let response = app.call(Method::POST, "/api/admin/login", Some(&body), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::new();

    for password in ["", "open-sesame", "OPEN-SESAME-42", "open-sesame-42 "] {
        let body = json!({ "password": password });
        let response = app.call(Method::POST, "/api/admin/login", Some(&body), None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{password:?}");
        assert_eq!(response.detail(), "Invalid admin credentials");
        assert_eq!(
            response.headers.get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = TestApp::new();
    let id = "00000000-0000-4000-8000-000000000000";

    let cases = [
        (Method::GET, "/api/admin/analytics".to_string()),
        (Method::GET, "/api/admin/contact-messages".to_string()),
        (Method::PUT, format!("/api/admin/contact-messages/{id}/read")),
        (Method::GET, "/api/admin/portfolio".to_string()),
    ];

    for (method, uri) in cases {
        let response = app.call(method, &uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(response.detail(), "Not authenticated");
        assert_eq!(
            response.headers.get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}

#[tokio::test]
async fn test_forged_token_is_rejected() {
    let app = TestApp::new();

    let mut forged_config = test_config().admin;
    forged_config.jwt_secret = "a-completely-different-signing-key".to_string().into();
    let forged = AdminAuthenticator::new(&forged_config)
        .unwrap()
        .issue_at(Utc::now())
        .unwrap();

    for token in [forged.as_str(), "not.a.jwt", "garbage"] {
        let response = app
            .call(Method::GET, "/api/admin/analytics", None, Some(token))
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.detail(), "Could not validate credentials");
    }
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new();
    let expired = AdminAuthenticator::new(&test_config().admin)
        .unwrap()
        .issue_at(Utc::now() - Duration::hours(3))
        .unwrap();

    let response = app
        .call(Method::GET, "/api/admin/analytics", None, Some(&expired))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.detail(), "Token has expired");
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected() {
    let app = TestApp::new();
    let token = app.login().await;
    let request = Request::builder()
        .uri("/api/admin/analytics")
        .header(header::AUTHORIZATION, format!("Basic {token}"))
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Message Administration
// ============================================================================

#[tokio::test]
async fn test_two_messages_one_read() {
    let app = TestApp::new();
    app.submit_contact("First").await;
    app.submit_contact("Second").await;
    let token = app.login().await;

    let messages = list(&app, &token, 10).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["subject"], "Second");
    assert_eq!(messages[1]["subject"], "First");

    let id = messages[1]["id"].as_str().unwrap();
    let response = app
        .call(
            Method::PUT,
            &format!("/api/admin/contact-messages/{id}/read"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["read"], true);
    assert_eq!(response.json()["id"], id);

    let snapshot = analytics(&app, &token).await;
    assert_eq!(snapshot["total_messages"], 2);
    assert_eq!(snapshot["unread_messages"], 1);
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let app = TestApp::new();
    app.submit_contact("Hello").await;
    let token = app.login().await;
    let id = list(&app, &token, 1).await[0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/admin/contact-messages/{id}/read");

    let first = app.call(Method::PUT, &uri, None, Some(&token)).await;
    let second = app.call(Method::PUT, &uri, None, Some(&token)).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(first.json(), second.json());
    assert_eq!(analytics(&app, &token).await["unread_messages"], 0);
}

#[tokio::test]
async fn test_mark_read_unknown_id_is_not_found() {
    let app = TestApp::new();
    app.submit_contact("Hello").await;
    let token = app.login().await;

    for id in ["00000000-0000-4000-8000-000000000000", "not-a-uuid"] {
        let response = app
            .call(
                Method::PUT,
                &format!("/api/admin/contact-messages/{id}/read"),
                None,
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{id}");
        assert_eq!(response.detail(), "Message not found");
    }

    // Nothing changed
    assert_eq!(analytics(&app, &token).await["unread_messages"], 1);
}

#[tokio::test]
async fn test_list_limit_is_clamped() {
    let app = TestApp::new();
    for i in 0..3 {
        app.submit_contact(&format!("Message {i}")).await;
    }
    let token = app.login().await;

    assert_eq!(list(&app, &token, 2).await.len(), 2);
    assert_eq!(list(&app, &token, 0).await.len(), 1);
    assert_eq!(list(&app, &token, 500).await.len(), 3);

    let response = app
        .call(Method::GET, "/api/admin/contact-messages", None, Some(&token))
        .await;
    assert_eq!(response.json().as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_non_numeric_limit_is_bad_request() {
    let app = TestApp::new();
    let token = app.login().await;

    let response = app
        .call(
            Method::GET,
            "/api/admin/contact-messages?limit=lots",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Analytics & Page Views
// ============================================================================

#[tokio::test]
async fn test_empty_store_analytics() {
    let app = TestApp::new();
    let token = app.login().await;

    let snapshot = analytics(&app, &token).await;
    assert_eq!(snapshot["page_views"], 0);
    assert_eq!(snapshot["total_messages"], 0);
    assert_eq!(snapshot["contact_submissions"], 0);
    assert_eq!(snapshot["unread_messages"], 0);
    assert!(snapshot["last_contact"].is_null());
}

#[tokio::test]
async fn test_last_contact_is_newest_timestamp() {
    let app = TestApp::new();
    app.submit_contact("First").await;
    app.submit_contact("Second").await;
    let token = app.login().await;

    let newest = list(&app, &token, 1).await[0]["timestamp"].clone();
    assert_eq!(analytics(&app, &token).await["last_contact"], newest);
}

#[tokio::test]
async fn test_page_view_tracking_increments_count() {
    let app = TestApp::new();

    let response = app.track(Some("projects")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["success"], true);

    app.track(None).await;

    let token = app.login().await;
    assert_eq!(analytics(&app, &token).await["page_views"], 2);
}

// ============================================================================
// Portfolio Sections
// ============================================================================

#[tokio::test]
async fn test_section_upsert_replaces_content() {
    let app = TestApp::new();
    let token = app.login().await;

    for headline in ["Hello", "Hello again"] {
        let body = json!({ "section_name": "about", "content": { "headline": headline } });
        let response = app.put_section(&token, &body).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.json()["message"],
            "Section 'about' updated successfully"
        );
    }

    let body = json!({ "section_name": "skills", "content": ["rust", "sql"] });
    app.put_section(&token, &body).await;

    let response = app
        .call(Method::GET, "/api/admin/portfolio", None, Some(&token))
        .await;
    let sections = response.json();
    let sections = sections.as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["section_name"], "about");
    assert_eq!(sections[0]["content"]["headline"], "Hello again");
    assert_eq!(sections[1]["section_name"], "skills");
}

#[tokio::test]
async fn test_section_without_name_is_rejected() {
    let app = TestApp::new();
    let token = app.login().await;
    let body = json!({ "section_name": " ", "content": {} });

    let response = app.put_section(&token, &body).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.detail(), "section_name is required");
}

// ============================================================================
// Storage Failures
// ============================================================================

#[tokio::test]
async fn test_submit_with_failing_store_returns_500_and_skips_notification() {
    let notifier = Arc::new(RecordingNotifier::working());
    let app = TestApp::with_failing_store(Arc::clone(&notifier));

    let response = app.submit_contact("Hello").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.detail(),
        "Failed to send message. Please try again later."
    );
    assert!(!String::from_utf8_lossy(&response.body).contains("db.internal"));

    assert_eq!(app.store.attempts(), 1);
    assert_eq!(notifier.calls(), 0);
}

#[tokio::test]
async fn test_admin_reads_with_failing_store_return_500() {
    let app = TestApp::with_failing_store(Arc::new(RecordingNotifier::working()));
    let token = app.login().await;

    for uri in ["/api/admin/analytics", "/api/admin/contact-messages"] {
        let response = app.call(Method::GET, uri, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(response.detail(), "Internal server error");
    }
}

#[tokio::test]
async fn test_tracking_and_readiness_with_failing_store() {
    let app = TestApp::with_failing_store(Arc::new(RecordingNotifier::working()));

    let response = app.track(Some("home")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.detail(), "Internal server error");

    let response = app.call(Method::GET, "/health/ready", None, None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}
