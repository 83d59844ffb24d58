//! End-to-end flows through the full router.

mod common;

use axum::http::{Method, StatusCode};
use common::{degraded_store, TestApp};
use jobportal_core::{Principal, Role};
use serde_json::{json, Value};

fn recruiter() -> Principal {
    Principal::new("U1", Role::Recruiter)
}

fn student(id: &str) -> Principal {
    Principal::new(id, Role::Student)
}

async fn register_company(app: &TestApp, name: &str) -> String {
    let response = app
        .post("/api/v1/company/register", Some(&recruiter()), json!({ "name": name }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.data()["id"].as_str().unwrap().to_string()
}

fn job_body(company_id: &str, title: &str) -> Value {
    json!({
        "title": title,
        "description": "Build and operate services",
        "requirements": ["Rust", "Tokio"],
        "salary": 120000,
        "location": "Remote",
        "job_type": "full-time",
        "positions": 1,
        "company_id": company_id,
    })
}

async fn post_job(app: &TestApp, company_id: &str, title: &str) -> String {
    let response = app
        .post("/api/v1/job/post", Some(&recruiter()), job_body(company_id, title))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    response.data()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_job_post_invalidates_job_listing() {
    let app = TestApp::new();
    let company_id = register_company(&app, "Acme").await;
    post_job(&app, &company_id, "Rust Engineer").await;

    let first = app.get("/api/v1/job/get", None).await;
    assert_eq!(first.data().as_array().unwrap().len(), 1);
    assert!(app.get("/api/v1/job/get", None).await.is_cache_hit());

    post_job(&app, &company_id, "Go Developer").await;

    let after = app.get("/api/v1/job/get", None).await;
    assert!(!after.is_cache_hit());
    assert_eq!(after.data().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_job_post_keeps_listing_cached() {
    let app = TestApp::new();
    let company_id = register_company(&app, "Acme").await;
    post_job(&app, &company_id, "Rust Engineer").await;
    app.get("/api/v1/job/get", None).await;

    // Students may not post jobs.
    let rejected = app
        .post("/api/v1/job/post", Some(&student("S1")), job_body(&company_id, "Intern"))
        .await;
    assert_eq!(rejected.status, StatusCode::FORBIDDEN);
    assert_eq!(rejected.body["success"], false);
    assert_eq!(rejected.body["error"]["code"], "FORBIDDEN");

    assert!(app.get("/api/v1/job/get", None).await.is_cache_hit());
}

#[tokio::test]
async fn test_job_detail_is_cached_per_id() {
    let app = TestApp::new();
    let company_id = register_company(&app, "Acme").await;
    let rust = post_job(&app, &company_id, "Rust Engineer").await;
    let go = post_job(&app, &company_id, "Go Developer").await;

    let rust_uri = format!("/api/v1/job/get/{rust}");
    let go_uri = format!("/api/v1/job/get/{go}");

    assert!(!app.get(&rust_uri, None).await.is_cache_hit());
    assert!(!app.get(&go_uri, None).await.is_cache_hit());
    let cached = app.get(&rust_uri, None).await;
    assert!(cached.is_cache_hit());
    assert_eq!(cached.data()["title"], "Rust Engineer");
}

#[tokio::test]
async fn test_principals_do_not_share_entries() {
    let app = TestApp::new();
    let company_id = register_company(&app, "Acme").await;
    post_job(&app, &company_id, "Rust Engineer").await;

    let mine = app.get("/api/v1/company/get", Some(&recruiter())).await;
    assert_eq!(mine.data().as_array().unwrap().len(), 1);

    let other = Principal::new("U2", Role::Recruiter);
    let theirs = app.get("/api/v1/company/get", Some(&other)).await;
    assert!(!theirs.is_cache_hit());
    assert!(theirs.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_guest_profile_request_is_rejected_and_not_cached() {
    let app = TestApp::new();

    let response = app.get("/api/v1/user/profile", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(app.store.stats().stores, 0);
}

#[tokio::test]
async fn test_profile_invalidation_is_scoped_to_caller() {
    let app = TestApp::new();
    let alice = student("S1");
    let bob = student("S2");

    app.get("/api/v1/user/profile", Some(&alice)).await;
    app.get("/api/v1/user/profile", Some(&bob)).await;

    let update = app
        .post(
            "/api/v1/user/profile/update",
            Some(&bob),
            json!({ "full_name": "Bob Builder" }),
        )
        .await;
    assert_eq!(update.status, StatusCode::OK);

    assert!(app.get("/api/v1/user/profile", Some(&alice)).await.is_cache_hit());
    let refreshed = app.get("/api/v1/user/profile", Some(&bob)).await;
    assert!(!refreshed.is_cache_hit());
    assert_eq!(refreshed.data()["full_name"], "Bob Builder");
}

#[tokio::test]
async fn test_status_update_refreshes_notifications_and_applicants() {
    let app = TestApp::new();
    let sam = student("S1");
    let company_id = register_company(&app, "Acme").await;
    let job_id = post_job(&app, &company_id, "Rust Engineer").await;

    let applied = app
        .post(&format!("/api/v1/application/apply/{job_id}"), Some(&sam), json!({}))
        .await;
    assert_eq!(applied.status, StatusCode::CREATED);
    let application_id = applied.data()["id"].as_str().unwrap().to_string();

    let applicants_uri = format!("/api/v1/application/applicants/{job_id}");
    let applicants = app.get(&applicants_uri, Some(&recruiter())).await;
    assert_eq!(applicants.data()[0]["status"], "pending");

    let notifications = app.get("/api/v1/notification/get", Some(&sam)).await;
    assert!(notifications.data().as_array().unwrap().is_empty());

    let update = app
        .post(
            &format!("/api/v1/application/status/{application_id}/update"),
            Some(&recruiter()),
            json!({ "status": "accepted" }),
        )
        .await;
    assert_eq!(update.status, StatusCode::OK);

    let applicants = app.get(&applicants_uri, Some(&recruiter())).await;
    assert!(!applicants.is_cache_hit());
    assert_eq!(applicants.data()[0]["status"], "accepted");

    let notifications = app.get("/api/v1/notification/get", Some(&sam)).await;
    assert!(!notifications.is_cache_hit());
    assert_eq!(notifications.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_saved_jobs_toggle_invalidates_list() {
    let app = TestApp::new();
    let sam = student("S1");
    let company_id = register_company(&app, "Acme").await;
    let job_id = post_job(&app, &company_id, "Rust Engineer").await;

    let empty = app.get("/api/v1/user/saved-jobs", Some(&sam)).await;
    assert!(empty.data().as_array().unwrap().is_empty());

    let toggle = app
        .post(&format!("/api/v1/user/saved-jobs/{job_id}"), Some(&sam), json!({}))
        .await;
    assert_eq!(toggle.data()["saved"], true);

    let saved = app.get("/api/v1/user/saved-jobs", Some(&sam)).await;
    assert!(!saved.is_cache_hit());
    assert_eq!(saved.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_id_is_a_validation_error() {
    let app = TestApp::new();
    let response = app.get("/api/v1/job/get/not-a-uuid", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_cookie_token_authenticates() {
    let app = TestApp::new();
    let token = app.token(&student("S1"));
    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/v1/user/profile")
        .header("cookie", format!("token={token}"))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = common::send(&app.router, request).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["id"], "S1");
}

#[tokio::test]
async fn test_invalid_token_is_treated_as_guest() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .uri("/api/v1/user/profile")
        .header("authorization", "Bearer garbage")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = common::send(&app.router, request).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_flow_survives_unreachable_cache_backend() {
    let app = TestApp::with_store(degraded_store());
    let company_id = register_company(&app, "Acme").await;
    post_job(&app, &company_id, "Rust Engineer").await;

    assert_eq!(app.get("/api/v1/job/get", None).await.status, StatusCode::OK);
    assert!(app.get("/api/v1/job/get", None).await.is_cache_hit());

    post_job(&app, &company_id, "Go Developer").await;
    let after = app.get("/api/v1/job/get", None).await;
    assert!(!after.is_cache_hit());
    assert_eq!(after.data().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_cache_health_reports_backend() {
    let app = TestApp::new();
    app.get("/api/v1/job/get", None).await;
    app.get("/api/v1/job/get", None).await;

    let health = app.get("/health/cache", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["backend"], "memory");
    assert_eq!(health.body["remote_configured"], false);
    assert_eq!(health.body["session_store"], "local");
    assert_eq!(health.body["stats"]["hits"], 1);
    assert_eq!(health.body["stats"]["misses"], 1);

    let degraded = TestApp::with_store(degraded_store());
    let health = degraded.get("/health/cache", None).await;
    assert_eq!(health.body["remote_configured"], true);
    assert_eq!(health.body["remote_ready"], false);
}
