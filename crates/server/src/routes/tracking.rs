//! Page view tracking.

use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, Query, State, rejection::QueryRejection},
    http::{Extensions, HeaderMap, header::USER_AGENT},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::services::analytics;
use crate::state::AppState;

/// Query string for `POST /api/track/page-view`.
#[derive(Debug, Default, Deserialize)]
pub struct PageViewQuery {
    #[serde(default)]
    pub page: Option<String>,
}

/// Tracking acknowledgement.
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub success: bool,
}

/// Record a page view.
///
/// POST /api/track/page-view?page=home
#[instrument(skip_all)]
pub async fn page_view(
    State(state): State<AppState>,
    headers: HeaderMap,
    extensions: Extensions,
    query: std::result::Result<Query<PageViewQuery>, QueryRejection>,
) -> Result<Json<TrackResponse>> {
    let Query(query) = query?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    analytics::track_page_view(
        state.store(),
        query.page.as_deref(),
        user_agent,
        client_ip(&headers, peer),
    )
    .await?;

    Ok(Json(TrackResponse { success: true }))
}

/// Best-effort client address.
///
/// Order: first `X-Forwarded-For` entry, `X-Real-IP`, then the socket peer.
#[must_use]
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_value(headers, "x-real-ip"))
        .map(String::from)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_ip(&headers, None).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_client_ip_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_ip(&headers, None).as_deref(), Some("198.51.100.2"));

        let peer: SocketAddr = "192.0.2.9:4321".parse().unwrap();
        assert_eq!(
            client_ip(&HeaderMap::new(), Some(peer)).as_deref(),
            Some("192.0.2.9")
        );
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }
}
