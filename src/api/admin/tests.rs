use axum::http::{Method, StatusCode};
use axum::{routing::get, Json, Router};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

fn directory_backend() -> Router {
    Router::new()
        .route(
            "/api/users",
            get(|| async {
                Json(json!([
                    {"_id": "stu-1", "firstName": "Sam", "lastName": "Lee", "email": "sam@uni.test", "role": "student"},
                    {"_id": "stu-2", "firstName": "Kim", "lastName": "Park", "email": "kim@uni.test"},
                    {"_id": "adv-1", "firstName": "Ada", "lastName": "Stone", "email": "ada@uni.test", "role": "advisor"},
                    {"_id": "adm-1", "firstName": "Root", "lastName": "User", "email": "root@uni.test", "role": "admin"}
                ]))
            }),
        )
        .route(
            "/api/subjects",
            get(|| async { Json(json!([{"_id": "s1"}, {"_id": "s2"}, {"_id": "s3"}])) }),
        )
        .route("/api/assignments", get(|| async { Json(json!([{"_id": "a1"}])) }))
}

#[tokio::test]
async fn analytics_counts_roles_and_records() {
    let ctx = test_support::setup_test_context(directory_backend()).await;
    let token = test_support::session_token("adm-1", Some("admin"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/admin/analytics",
            Some(&token),
            None,
        ))
        .await
        .expect("analytics");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(
        body,
        json!({"students": 2, "advisors": 1, "admins": 1, "subjects": 3, "assignments": 1})
    );
}

#[tokio::test]
async fn non_admin_cannot_read_analytics() {
    let ctx = test_support::setup_test_context(directory_backend()).await;
    let token = test_support::session_token("adv-1", Some("advisor"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/admin/analytics",
            Some(&token),
            None,
        ))
        .await
        .expect("analytics");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn user_table_filters_by_role_and_search() {
    let ctx = test_support::setup_test_context(directory_backend()).await;
    let token = test_support::session_token("adm-1", Some("admin"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/admin/users?role=student&search=LEE",
            Some(&token),
            None,
        ))
        .await
        .expect("users");

    assert_eq!(response.status(), StatusCode::OK);
    let users = test_support::read_json(response).await;
    let users = users.as_array().expect("list");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["_id"], "stu-1");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/admin/users?role=tutor",
            Some(&token),
            None,
        ))
        .await
        .expect("users");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_cannot_delete_own_account() {
    let ctx = test_support::setup_test_context(directory_backend()).await;
    let token = test_support::session_token("adm-1", Some("admin"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            "/api/v1/admin/users/adm-1",
            Some(&token),
            None,
        ))
        .await
        .expect("delete user");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let ctx = test_support::setup_test_context(directory_backend()).await;
    let token = test_support::session_token("adm-1", Some("admin"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/admin/users",
            Some(&token),
            Some(json!({
                "firstName": "New",
                "lastName": "Student",
                "email": "not-an-email",
                "password": "secret-pass"
            })),
        ))
        .await
        .expect("create user");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
