use axum::extract::Path;
use axum::http::{Method, StatusCode};
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::test_support;

fn student_records() -> Router {
    Router::new()
        .route(
            "/api/users/:user_id",
            get(|Path(user_id): Path<String>| async move {
                if user_id == "stu-1" {
                    Ok(Json(json!({
                        "_id": "stu-1",
                        "firstName": "Sam",
                        "lastName": "Lee",
                        "email": "sam@uni.test",
                        "role": "student"
                    })))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        )
        .route(
            "/api/subjects/user/:user_id",
            get(|| async {
                Json(json!([
                    {"_id": "s1", "subjectTitle": "Physics"},
                    {"_id": "s2", "subjectTitle": "History", "targetGrade": 85},
                    {"_id": "s3", "subjectTitle": "Music", "targetGrade": 0}
                ]))
            }),
        )
        .route(
            "/api/assignments/user/:user_id",
            get(|| async {
                Json(json!([
                    {"_id": "a1", "name": "Lab report", "s_id": {"_id": "s1", "subjectTitle": "Physics"}}
                ]))
            }),
        )
        .route(
            "/api/grades/user/:user_id",
            get(|| async {
                Json(json!([
                    {"_id": "g1", "grade": 18, "outOf": 20, "s_id": "s1", "a_id": "a1"}
                ]))
            }),
        )
        .route(
            "/api/feedback/:kind/:entity_id",
            get(|Path((kind, entity_id)): Path<(String, String)>| async move {
                if kind == "assignment" && entity_id == "a1" {
                    Ok(Json(json!([
                        {"_id": "f1", "feedback_text": "Solid method", "assignment_id": "a1"}
                    ])))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        )
}

#[tokio::test]
async fn student_sees_own_performance() {
    let ctx = test_support::setup_test_context(student_records()).await;
    let token = test_support::session_token("stu-1", Some("student"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/me/performance",
            Some(&token),
            None,
        ))
        .await
        .expect("performance");

    let status = response.status();
    let page = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {page}");

    assert_eq!(page["student"]["_id"], "stu-1");
    assert_eq!(page["student"]["firstName"], "Sam");

    let physics = &page["subjects"][0];
    assert_eq!(physics["_id"], "s1");
    assert_eq!(physics["totalAssignments"], 1);
    assert_eq!(physics["totalAchieved"], 18.0);
    assert_eq!(physics["totalOutOf"], 20.0);
    assert_eq!(physics["totalLose"], 2.0);
    assert_eq!(physics["targetGrade"], 70.0);
    assert_eq!(page["subjects"][1]["targetGrade"], 85.0);
    assert_eq!(page["subjects"][2]["targetGrade"], 70.0);

    assert_eq!(page["assignments"][0]["gradeStatus"], "graded");
    assert_eq!(page["assignments"][0]["grade"]["_id"], "g1");

    assert_eq!(page["panels"][0]["assignment_ids"], json!(["a1"]));
    assert_eq!(page["panels"][0]["feedback_count"], 0);
    assert!(page["panels"][1]["empty_message"].is_string());

    assert_eq!(page["feedback"]["subject"]["s1"], json!([]));
    assert_eq!(page["feedback"]["subject"]["s2"], json!([]));
    assert_eq!(page["feedback"]["subject"]["s3"], json!([]));
    assert_eq!(page["feedback"]["assignment"]["a1"][0]["feedback_text"], "Solid method");
}

#[tokio::test]
async fn advisor_view_renders_without_student_profile() {
    let ctx = test_support::setup_test_context(student_records()).await;
    let token = test_support::session_token("adv-1", Some("advisor"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/students/stu-9/performance",
            Some(&token),
            None,
        ))
        .await
        .expect("performance");

    let status = response.status();
    let page = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {page}");
    assert_eq!(page["student"], Value::Null);
    assert_eq!(page["subjects"][0]["_id"], "s1");
}

#[tokio::test]
async fn student_cannot_view_another_student() {
    let ctx = test_support::setup_test_context(student_records()).await;
    let token = test_support::session_token("stu-1", Some("student"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/students/stu-2/performance",
            Some(&token),
            None,
        ))
        .await
        .expect("performance");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn upstream_failure_reads_as_bad_gateway() {
    let upstream = Router::new()
        .route("/api/subjects/user/:user_id", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/api/assignments/user/:user_id", get(|| async { Json(json!([])) }))
        .route("/api/grades/user/:user_id", get(|| async { Json(json!([])) }));
    let ctx = test_support::setup_test_context(upstream).await;
    let token = test_support::session_token("adv-1", Some("advisor"), &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/students/stu-1/performance",
            Some(&token),
            None,
        ))
        .await
        .expect("performance");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = test_support::read_json(response).await;
    assert_eq!(body["detail"], "Failed to fetch data.");
}

#[tokio::test]
async fn missing_role_claim_is_looked_up_upstream() {
    let upstream = Router::new()
        .route(
            "/api/users/:user_id",
            get(|Path(user_id): Path<String>| async move {
                Json(json!({"_id": user_id, "firstName": "Ada", "role": "advisor"}))
            }),
        )
        .route(
            "/api/users",
            get(|| async {
                Json(json!([
                    {"_id": "stu-1", "firstName": "Sam", "lastName": "Lee", "role": "student"},
                    {"_id": "stu-2", "firstName": "Kim", "lastName": "Park"},
                    {"_id": "adv-1", "firstName": "Ada", "lastName": "Stone", "role": "advisor"}
                ]))
            }),
        );
    let ctx = test_support::setup_test_context(upstream).await;
    let token = test_support::session_token("adv-1", None, &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/me", Some(&token), None))
        .await
        .expect("me");
    let me = test_support::read_json(response).await;
    assert_eq!(me, json!({"user_id": "adv-1", "role": "advisor"}));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/students?search=park",
            Some(&token),
            None,
        ))
        .await
        .expect("students");
    assert_eq!(response.status(), StatusCode::OK);
    let students: Value = test_support::read_json(response).await;
    let ids: Vec<&str> =
        students.as_array().expect("list").iter().filter_map(|user| user["_id"].as_str()).collect();
    assert_eq!(ids, vec!["stu-2"]);
}

#[tokio::test]
async fn unknown_user_defaults_to_student() {
    let ctx = test_support::setup_test_context(Router::new()).await;
    let token = test_support::session_token("ghost", None, &ctx.settings);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/students", Some(&token), None))
        .await
        .expect("students");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
