use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use raven_rush_server::{
    app::{router, AppState},
    repository::{memory::MemoryStore, Store},
};
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tower::ServiceExt;

fn test_app() -> Router {
    let (tx, _rx) = broadcast::channel(16);
    let store = Store::Memory(Arc::new(MemoryStore::default()));
    router(Arc::new(AppState::new(store, tx)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/user")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn act(app: &Router, address: &str, action: &str) -> (StatusCode, Value) {
    post(app, json!({ "address": address, "action": action })).await
}

#[tokio::test]
async fn ensure_creates_zero_valued_user() {
    let app = test_app();

    let (status, body) = act(&app, "0xAbC", "ensure").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["address"], json!("0xabc"));
    assert_eq!(body["user"]["points"], json!(0));
    assert_eq!(body["user"]["boosts"], json!(0));
    assert_eq!(body["user"]["lastCheckIn"], Value::Null);
    assert_eq!(body["user"]["rank"], json!(1));

    // ensure is safe to repeat
    let (status, body) = act(&app, "0xabc", "ensure").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["leaderboard"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn check_in_rewards_then_hits_cooldown() {
    let app = test_app();

    let (status, body) = act(&app, "0xabc", "checkin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["points"], json!(10));
    assert!(body["user"]["lastCheckIn"].is_i64());

    let (status, body) = act(&app, "0xabc", "checkin").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], json!("Check-in cooldown active"));

    // points unchanged by the rejected attempt
    let (_, body) = get(&app, "/api/user?address=0xabc").await;
    assert_eq!(body["current"]["points"], json!(10));
}

#[tokio::test]
async fn boosts_stack_without_cooldown() {
    let app = test_app();

    for _ in 0..3 {
        let (status, _) = act(&app, "0xabc", "boost").await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = get(&app, "/api/user?address=0xABC").await;
    assert_eq!(body["current"]["points"], json!(600));
    assert_eq!(body["current"]["boosts"], json!(3));
}

#[tokio::test]
async fn leaderboard_includes_zero_point_users_at_the_bottom() {
    let app = test_app();
    act(&app, "0xaaa", "boost").await;
    act(&app, "0xbbb", "ensure").await;

    let (status, body) = get(&app, "/api/user").await;
    assert_eq!(status, StatusCode::OK);
    let leaderboard = body.as_array().unwrap();
    assert_eq!(leaderboard.len(), 2);
    assert_eq!(leaderboard[0]["address"], json!("0xaaa"));
    assert_eq!(leaderboard[0]["rank"], json!(1));
    assert_eq!(leaderboard[1]["address"], json!("0xbbb"));
    assert_eq!(leaderboard[1]["points"], json!(0));
    assert_eq!(leaderboard[1]["rank"], json!(2));
}

#[tokio::test]
async fn lookup_with_address_returns_leaderboard_and_current() {
    let app = test_app();
    act(&app, "0xaaa", "boost").await;

    let (status, body) = get(&app, "/api/user?address=0xAAA").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current"]["address"], json!("0xaaa"));
    assert_eq!(body["current"]["points"], json!(200));

    let (status, body) = get(&app, "/api/user?address=0xunknown").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current"], Value::Null);
    assert_eq!(body["leaderboard"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_address_is_rejected() {
    let app = test_app();

    let (status, body) = post(&app, json!({ "action": "checkin" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid address"));

    let (status, _) = post(&app, json!({ "address": "", "action": "checkin" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let app = test_app();

    let (status, body) = act(&app, "0xabc", "spin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Unknown action"));

    // nothing was persisted for the address
    let (_, body) = get(&app, "/api/user").await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn addresses_are_normalized_on_write() {
    let app = test_app();

    let (_, body) = act(&app, "0xDeAdBeEf", "boost").await;
    assert_eq!(body["user"]["address"], json!("0xdeadbeef"));

    let (_, body) = get(&app, "/api/user").await;
    assert_eq!(body[0]["address"], json!("0xdeadbeef"));
}
