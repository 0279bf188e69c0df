use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, StatusCode};
use axum::{routing::post, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::test_support;

type Received = Arc<Mutex<Vec<Value>>>;

fn push_backend(received: Received) -> Router {
    Router::new()
        .route(
            "/subscribe",
            post(|State(received): State<Received>, body: String| async move {
                let parsed = serde_json::from_str(&body).unwrap_or(Value::Null);
                received.lock().expect("received").push(parsed);
                (StatusCode::CREATED, "Subscribed")
            }),
        )
        .with_state(received)
}

#[tokio::test]
async fn public_key_needs_no_session() {
    let ctx = test_support::setup_test_context(Router::new()).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/push/public-key", None, None))
        .await
        .expect("public key");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["publicKey"], ctx.settings.push().vapid_public_key.as_str());
}

#[tokio::test]
async fn subscription_is_forwarded_with_reminder() {
    let received: Received = Arc::default();
    let ctx = test_support::setup_test_context(push_backend(received.clone())).await;
    let token = test_support::session_token("stu-1", Some("student"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/push/subscribe",
            Some(&token),
            Some(json!({
                "subscription": {"endpoint": "https://push.example/abc", "keys": {"auth": "k"}},
                "reminderTime": "2026-11-02T08:00:00Z",
                "message": " Essay due "
            })),
        ))
        .await
        .expect("subscribe");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(test_support::read_json(response).await, json!({"subscribed": true}));

    let received = received.lock().expect("received").clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["subscription"]["endpoint"], "https://push.example/abc");
    assert_eq!(received[0]["reminderTime"], "2026-11-02T08:00:00Z");
    assert_eq!(received[0]["message"], "Essay due");
}

#[tokio::test]
async fn subscription_without_endpoint_is_rejected() {
    let received: Received = Arc::default();
    let ctx = test_support::setup_test_context(push_backend(received.clone())).await;
    let token = test_support::session_token("stu-1", Some("student"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/push/subscribe",
            Some(&token),
            Some(json!({
                "subscription": {"keys": {}},
                "reminderTime": "2026-11-02T08:00:00Z",
                "message": "Essay due"
            })),
        ))
        .await
        .expect("subscribe");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(received.lock().expect("received").is_empty());
}

#[tokio::test]
async fn preview_falls_back_for_unreadable_payload() {
    let ctx = test_support::setup_test_context(Router::new()).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/push/preview")
        .body(Body::from("not json"))
        .expect("request");
    let response = ctx.app.clone().oneshot(request).await.expect("preview");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        test_support::read_json(response).await,
        json!({"title": "New Reminder", "body": "You have a new reminder!"})
    );
}
