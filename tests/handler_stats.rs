mod common;

use chrono::Duration;
use common::{BROWSER_UA, PEER_ADDR, TOKEN_A, TOKEN_B, TestApp, bearer};
use serde_json::Value;

#[tokio::test]
async fn test_stats_start_at_zero() {
    let app = TestApp::new();
    let server = app.api_server();

    let response = server
        .get("/api/stats")
        .add_header("Authorization", bearer())
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_clicks"], 0);
    assert_eq!(body["unique_clicks"], 0);
    assert_eq!(body["failed_clicks"], 0);
}

#[tokio::test]
async fn test_stats_reflect_clicks() {
    let app = TestApp::new();
    app.seed_placement("p1", "https://shop.example.com/a", Duration::hours(1));
    let public = app.public_server(PEER_ADDR);
    let api = app.api_server();

    for token in [TOKEN_A, TOKEN_A, TOKEN_B] {
        public
            .get(&app.click_path("p1", token))
            .add_header("User-Agent", BROWSER_UA)
            .await;
    }
    public
        .get(&app.click_path("p1", TOKEN_B))
        .add_header("User-Agent", "python-requests/2.31")
        .await;

    let body: Value = api
        .get("/api/stats")
        .add_header("Authorization", bearer())
        .await
        .json();

    assert_eq!(body["total_clicks"], 4);
    assert_eq!(body["unique_clicks"], 2);
    assert_eq!(body["failed_clicks"], 2);
}

#[tokio::test]
async fn test_stats_require_authentication() {
    let app = TestApp::new();
    let server = app.api_server();

    let response = server.get("/api/stats").await;

    assert_eq!(response.status_code(), 401);
}
