//! Handler for the tracking redirect endpoint.

use axum::{
    extract::{ConnectInfo, RawQuery, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use tracing::{error, warn};
use url::form_urlencoded;

use crate::domain::entities::ClickAttempt;
use crate::state::AppState;
use crate::utils::client_ip::resolve_client_ip;

/// Validates a click and redirects the browser.
///
/// # Endpoint
///
/// `GET /c?placementId=<id>&sig=<hex>&_bhlid=<token>`
///
/// # Response
///
/// Always `302 Found` with `Cache-Control: no-store`:
///
/// - **Billable click**: `Location` is the placement's landing page
/// - **Anything else**: `Location` is the configured fallback URL
///
/// The rejection reason is logged, never returned. A malformed query string,
/// a storage outage or a panic inside the pipeline all end in the fallback
/// redirect.
///
/// # Isolation
///
/// The pipeline runs in its own task; a panic there is counted as a failed
/// click instead of tearing down the connection.
pub async fn click_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Response {
    let params = parse_query(query.as_deref().unwrap_or_default());
    let ip = resolve_client_ip(&headers, addr, state.behind_proxy);
    let user_agent = headers
        .get(header::USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();

    let attempt = ClickAttempt::new(ip, params, user_agent);

    let service = state.click_service.clone();
    let target = match tokio::spawn(async move { service.process(attempt).await }).await {
        Ok(outcome) => state.click_service.redirect_target(&outcome).to_string(),
        Err(e) => {
            error!("Click processing task failed: {}", e);
            state.click_service.record_fault();
            state.click_service.fallback_url().to_string()
        }
    };

    found(&target, state.click_service.fallback_url())
}

/// Decodes a query string; the first occurrence of a repeated name wins.
pub(crate) fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

fn found(target: &str, fallback: &str) -> Response {
    let location = HeaderValue::from_str(target).unwrap_or_else(|_| {
        warn!("Redirect target is not a valid header value, using fallback");
        HeaderValue::from_str(fallback).unwrap_or_else(|_| HeaderValue::from_static("/"))
    });

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
    )
        .into_response()
}
