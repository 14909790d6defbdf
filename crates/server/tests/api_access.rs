//! # Access Control Tests
//!
//! Login, bearer authentication and role gating through the full router.

mod common;

use auth::{secrecy::SecretString, verify_password};
use common::{ALICE_EMAIL, MANAGER_EMAIL, TestApp};
use entity::users;
use http::{Method, StatusCode};
use migration::seeds::DEMO_PASSWORD;
use sea_orm::{EntityTrait, ModelTrait};
use serde_json::json;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": MANAGER_EMAIL, "password": DEMO_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["email"], MANAGER_EMAIL);
    assert_eq!(body["user"]["role"], "manager");
    assert!(body["user"].get("password_hash").is_none());

    let token = body["access_token"].as_str().unwrap();
    let (status, me) = app.get("/auth/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], MANAGER_EMAIL);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;

    let unknown = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "nobody@company.com", "password": DEMO_PASSWORD })),
        )
        .await;
    let wrong_password = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": MANAGER_EMAIL, "password": "not-the-password" })),
        )
        .await;

    assert_eq!(unknown.0, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong_password);
    assert_eq!(unknown.1["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_unknown_email_still_runs_password_check() {
    let app = TestApp::new().await;
    assert!(!app.state.login_decoy_ready());

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "nobody@company.com", "password": DEMO_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.state.login_decoy_ready());

    let decoy = app.state.login_decoy_hash().await.unwrap().to_string();
    assert!(decoy.starts_with("$argon2id$"));
    assert_eq!(app.state.login_decoy_hash().await.unwrap(), decoy);
    for guess in [DEMO_PASSWORD, "", "not-the-password"] {
        let guess = SecretString::from(guess.to_string());
        assert!(verify_password(&guess, &decoy).is_err());
    }
}

#[tokio::test]
async fn test_protected_routes_require_a_valid_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/feedback", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app.get("/feedback", "not.a.jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut tampered = app.token_for(MANAGER_EMAIL).await;
    tampered.push('x');
    let (status, _) = app.get("/feedback", &tampered).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let app = TestApp::new().await;
    let token = app.token_for(ALICE_EMAIL).await;

    let alice = app.user(ALICE_EMAIL).await;
    let alice_id = alice.id;
    alice.delete(&app.state.db).await.unwrap();
    assert!(
        users::Entity::find_by_id(alice_id)
            .one(&app.state.db)
            .await
            .unwrap()
            .is_none()
    );

    let (status, body) = app.get("/auth/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_manager_only_routes_reject_employees() {
    let app = TestApp::new().await;
    let token = app.token_for(ALICE_EMAIL).await;

    for uri in ["/users", "/users/team", "/users/managers", "/dashboard/stats"] {
        let (status, body) = app.get(uri, &token).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["code"], "FORBIDDEN");
    }

    let (status, _) = app
        .post("/tags", &token, json!({ "name": "Mentoring" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_managers_cannot_acknowledge() {
    let app = TestApp::new().await;
    let token = app.token_for(MANAGER_EMAIL).await;

    let (status, _) = app.post("/feedback/1/acknowledge", &token, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/feedback-requests",
            &token,
            json!({ "message": "How am I doing?" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tag_listing_is_public_but_creation_is_not() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/tags", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 6);
    assert_eq!(body[0]["name"], "Communication");

    let (status, _) = app
        .send(
            Method::POST,
            "/tags",
            None,
            Some(json!({ "name": "Mentoring" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_input_uses_error_body() {
    let app = TestApp::new().await;
    let token = app.token_for(MANAGER_EMAIL).await;

    let (status, body) = app
        .post("/feedback", &token, json!({ "employee_id": 2 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Missing required field: strengths");

    let (status, body) = app.put("/feedback/abc", &token, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    use axum::body::Body;
    use tower::ServiceExt;

    let app = TestApp::new().await;

    let request = http::Request::builder()
        .uri("/health")
        .header("x-request-id", "req-abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-abc-123");

    let request = http::Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(!response.headers()["x-request-id"].is_empty());
}
