mod common;

use chrono::Duration;
use common::{BASE_URL, BROWSER_UA, FALLBACK_URL, PEER_ADDR, TOKEN_A, TestApp, bearer, test_config};
use serde_json::{Value, json};

fn placement_body(send_id: &str) -> Value {
    json!({
        "advertiser_id": "adv-42",
        "publisher_id": "pub-7",
        "send_id": send_id,
        "price_cpc_cents": 150,
        "landing_url": "https://shop.example.com/spring"
    })
}

#[tokio::test]
async fn test_requires_bearer_token() {
    let app = TestApp::new();
    let server = app.api_server();

    let response = server.get("/api/placements").await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(response.header("www-authenticate"), "Bearer");
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_rejects_wrong_token() {
    let app = TestApp::new();
    let server = app.api_server();

    let response = server
        .get("/api/placements")
        .add_header("Authorization", "Bearer not-the-token")
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_disabled_without_configured_token() {
    let mut config = test_config();
    config.api_token = None;
    let app = TestApp::with_config(config);
    let server = app.api_server();

    let response = server
        .get("/api/placements")
        .add_header("Authorization", bearer())
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_create_placement_returns_tracking_link() {
    let app = TestApp::new();
    let server = app.api_server();

    let response = server
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&placement_body("send-1"))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    let id = body["id"].as_str().unwrap();
    let link = body["tracking_link"].as_str().unwrap();

    assert_eq!(id.len(), 22);
    assert_eq!(body["price_cpc_cents"], 150);
    assert_eq!(body["is_fresh"], true);
    assert!(link.starts_with(&format!("{BASE_URL}/c?placementId={id}&sig=")));
}

#[tokio::test]
async fn test_created_link_is_billable_through_click_endpoint() {
    let app = TestApp::new();
    let api = app.api_server();
    let public = app.public_server(PEER_ADDR);

    let body: Value = api
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&placement_body("send-1"))
        .await
        .json();

    let link = body["tracking_link"].as_str().unwrap();
    let path = link.strip_prefix(BASE_URL).unwrap();

    let response = public
        .get(&format!("{path}&_bhlid={TOKEN_A}"))
        .add_header("User-Agent", BROWSER_UA)
        .await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://shop.example.com/spring");
}

#[tokio::test]
async fn test_create_rejects_negative_price() {
    let app = TestApp::new();
    let server = app.api_server();

    let mut body = placement_body("send-1");
    body["price_cpc_cents"] = json!(-10);

    let response = server
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&body)
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_create_rejects_invalid_landing_url() {
    let app = TestApp::new();
    let server = app.api_server();

    let mut body = placement_body("send-1");
    body["landing_url"] = json!("ftp://files.example.com/offer");

    let response = server
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&body)
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_create_duplicate_combination_conflicts() {
    let app = TestApp::new();
    let server = app.api_server();

    let first = server
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&placement_body("send-1"))
        .await;
    let second = server
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&placement_body("send-1"))
        .await;

    assert_eq!(first.status_code(), 201);
    assert_eq!(second.status_code(), 409);
    let body: Value = second.json();
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let app = TestApp::new();
    let server = app.api_server();

    for send in ["send-1", "send-2", "send-3"] {
        server
            .post("/api/placements")
            .add_header("Authorization", bearer())
            .json(&placement_body(send))
            .await;
    }

    let all: Value = server
        .get("/api/placements")
        .add_header("Authorization", bearer())
        .await
        .json();
    assert_eq!(all["pagination"]["total"], 3);
    assert_eq!(all["pagination"]["page"], 1);
    assert_eq!(all["items"].as_array().unwrap().len(), 3);

    let filtered: Value = server
        .get("/api/placements?send_id=send-2")
        .add_header("Authorization", bearer())
        .await
        .json();
    assert_eq!(filtered["pagination"]["total"], 1);
    assert_eq!(filtered["items"][0]["send_id"], "send-2");

    let second_page: Value = server
        .get("/api/placements?page=2&page_size=10")
        .add_header("Authorization", bearer())
        .await
        .json();
    assert_eq!(second_page["pagination"]["total"], 3);
    assert!(second_page["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_rejects_invalid_page_size() {
    let app = TestApp::new();
    let server = app.api_server();

    let response = server
        .get("/api/placements?page_size=5")
        .add_header("Authorization", bearer())
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_get_placement() {
    let app = TestApp::new();
    app.seed_placement("p1", "https://shop.example.com/a", Duration::hours(100));
    let server = app.api_server();

    let response = server
        .get("/api/placements/p1")
        .add_header("Authorization", bearer())
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["id"], "p1");
    assert_eq!(body["is_fresh"], false);
}

#[tokio::test]
async fn test_get_missing_placement_is_not_found() {
    let app = TestApp::new();
    let server = app.api_server();

    let response = server
        .get("/api/placements/missing")
        .add_header("Authorization", bearer())
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_delete_stops_billing() {
    let app = TestApp::new();
    app.seed_placement("p1", "https://shop.example.com/a", Duration::hours(1));
    let api = app.api_server();
    let public = app.public_server(PEER_ADDR);

    let deleted = api
        .delete("/api/placements/p1")
        .add_header("Authorization", bearer())
        .await;
    assert_eq!(deleted.status_code(), 204);

    let again = api
        .delete("/api/placements/p1")
        .add_header("Authorization", bearer())
        .await;
    assert_eq!(again.status_code(), 404);

    let fetched = api
        .get("/api/placements/p1")
        .add_header("Authorization", bearer())
        .await;
    assert_eq!(fetched.status_code(), 404);

    let click = public
        .get(&app.click_path("p1", TOKEN_A))
        .add_header("User-Agent", BROWSER_UA)
        .await;
    assert_eq!(click.header("location"), FALLBACK_URL);
}

#[tokio::test]
async fn test_deleted_combination_can_be_recreated() {
    let app = TestApp::new();
    let server = app.api_server();

    let created: Value = server
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&placement_body("send-1"))
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    server
        .delete(&format!("/api/placements/{id}"))
        .add_header("Authorization", bearer())
        .await;

    let recreated = server
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&placement_body("send-1"))
        .await;

    assert_eq!(recreated.status_code(), 201);
}

#[tokio::test]
async fn test_update_changes_price_and_send() {
    let app = TestApp::new();
    let server = app.api_server();

    let created: Value = server
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&placement_body("send-1"))
        .await
        .json();
    let id = created["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/placements/{id}"))
        .add_header("Authorization", bearer())
        .json(&json!({ "price_cpc_cents": 175, "send_id": "send-2" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["price_cpc_cents"], 175);
    assert_eq!(body["send_id"], "send-2");
    assert_eq!(body["advertiser_id"], "adv-42");
    assert_eq!(body["tracking_link"], created["tracking_link"]);

    let fetched: Value = server
        .get(&format!("/api/placements/{id}"))
        .add_header("Authorization", bearer())
        .await
        .json();
    assert_eq!(fetched["send_id"], "send-2");
}

#[tokio::test]
async fn test_update_price_only_keeps_send() {
    let app = TestApp::new();
    app.seed_placement("p1", "https://shop.example.com/a", Duration::hours(1));
    let server = app.api_server();

    let response = server
        .patch("/api/placements/p1")
        .add_header("Authorization", bearer())
        .json(&json!({ "price_cpc_cents": 0 }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["price_cpc_cents"], 0);
    assert_eq!(body["landing_url"], "https://shop.example.com/a");
}

#[tokio::test]
async fn test_update_without_fields_is_rejected() {
    let app = TestApp::new();
    app.seed_placement("p1", "https://shop.example.com/a", Duration::hours(1));
    let server = app.api_server();

    let response = server
        .patch("/api/placements/p1")
        .add_header("Authorization", bearer())
        .json(&json!({}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_update_rejects_negative_price() {
    let app = TestApp::new();
    app.seed_placement("p1", "https://shop.example.com/a", Duration::hours(1));
    let server = app.api_server();

    let response = server
        .patch("/api/placements/p1")
        .add_header("Authorization", bearer())
        .json(&json!({ "price_cpc_cents": -5 }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_update_to_existing_combination_conflicts() {
    let app = TestApp::new();
    let server = app.api_server();

    server
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&placement_body("send-1"))
        .await;
    let second: Value = server
        .post("/api/placements")
        .add_header("Authorization", bearer())
        .json(&placement_body("send-2"))
        .await
        .json();
    let id = second["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/placements/{id}"))
        .add_header("Authorization", bearer())
        .json(&json!({ "send_id": "send-1" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn test_update_missing_or_deleted_is_not_found() {
    let app = TestApp::new();
    app.seed_placement("p1", "https://shop.example.com/a", Duration::hours(1));
    let server = app.api_server();

    server
        .delete("/api/placements/p1")
        .add_header("Authorization", bearer())
        .await;

    for path in ["/api/placements/p1", "/api/placements/missing"] {
        let response = server
            .patch(path)
            .add_header("Authorization", bearer())
            .json(&json!({ "price_cpc_cents": 10 }))
            .await;

        assert_eq!(response.status_code(), 404);
    }
}
