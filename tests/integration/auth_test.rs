//! Integration tests for registration, verification, and login.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_unverified_account_cannot_log_in() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "Lina@Example.com", "password": PASSWORD, "name": "Lina" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["user"]["email"], "lina@example.com");
    assert_eq!(response.body["data"]["user"]["email_verified"], false);
    assert!(response.body["data"]["user"].get("password_hash").is_none());

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "lina@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verification_unlocks_login_and_welcomes() {
    let app = TestApp::new();
    let lina = app.customer("lina@example.com", "Lina").await;

    let me = app.request("GET", "/api/auth/me", None, Some(&lina.token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["role"], "customer");
    assert_eq!(me.body["data"]["email_verified"], true);

    let mailbox = app.request("GET", "/api/notifications", None, Some(&lina.token)).await;
    assert_eq!(mailbox.body["data"]["items"][0]["title"], "Welcome to Wasil");
}

#[tokio::test]
async fn test_verification_token_is_single_use() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "lina@example.com", "password": PASSWORD, "name": "Lina" })),
            None,
        )
        .await;
    let token = response.body["data"]["verification_token"].as_str().unwrap().to_string();

    let first = app.request("POST", "/api/auth/verify", Some(json!({ "token": token })), None).await;
    assert_eq!(first.status, StatusCode::OK);
    let second = app.request("POST", "/api/auth/verify", Some(json!({ "token": token })), None).await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registration_rejects_bad_input() {
    let app = TestApp::new();

    let bad_email = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "not-an-email", "password": PASSWORD, "name": "Lina" })),
            None,
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.body["error"], "VALIDATION_ERROR");

    let weak = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "lina@example.com", "password": "password", "name": "Lina" })),
            None,
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);

    app.customer("karim@example.com", "Karim").await;
    let duplicate = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "KARIM@example.com", "password": PASSWORD, "name": "Karim" })),
            None,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new();
    app.customer("lina@example.com", "Lina").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "lina@example.com", "password": "Wrong-Password-77" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_bad_tokens_are_rejected() {
    let app = TestApp::new();

    let garbage = app.request("GET", "/api/auth/me", None, Some("not.a.jwt")).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let missing = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update() {
    let app = TestApp::new();
    let lina = app.customer("lina@example.com", "Lina").await;

    let updated = app
        .request(
            "PATCH",
            "/api/auth/me",
            Some(json!({ "phone": "+33 6 12 34 56 78", "country": "France", "photo_url": "http://evil" })),
            Some(&lina.token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["country"], "France");
    assert_eq!(updated.body["data"]["photo_url"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "memory");
}
