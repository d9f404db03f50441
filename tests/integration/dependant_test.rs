//! Integration tests for dependant profiles, mission dossiers, and media.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use helpers::{Account, TestApp, TestResponse};

const BOUNDARY: &str = "wasil-test-boundary";

async fn upload(app: &TestApp, path: &str, account: &Account, content_type: &str, data: &[u8]) -> TestResponse {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .header("Authorization", format!("Bearer {}", account.token))
        .body(Body::from(body))
        .unwrap();
    app.send(req).await
}

#[tokio::test]
async fn test_dependant_crud() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;
    let mom = app.dependant(&maya, "Nadia").await;
    app.dependant(&maya, "Georges").await;

    let list = app.request("GET", "/api/dependants", None, Some(&maya.token)).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body["data"].as_array().unwrap().len(), 2);
    assert_eq!(list.body["data"][0]["name"], "Nadia");

    let updated = app
        .request(
            "PATCH",
            &format!("/api/dependants/{mom}"),
            Some(json!({ "location": "beirut_ashrafieh", "medications": ["Metformin", "Aspirin"] })),
            Some(&maya.token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["location"], "beirut_ashrafieh");
    assert_eq!(updated.body["data"]["medications"].as_array().unwrap().len(), 2);

    let deleted = app
        .request("DELETE", &format!("/api/dependants/{mom}"), None, Some(&maya.token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = app
        .request("GET", &format!("/api/dependants/{mom}"), None, Some(&maya.token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dependants_are_private_to_their_owner() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;
    let karim = app.customer("karim@example.com", "Karim").await;
    let mom = app.dependant(&maya, "Nadia").await;

    let peek = app
        .request("GET", &format!("/api/dependants/{mom}"), None, Some(&karim.token))
        .await;
    assert_eq!(peek.status, StatusCode::NOT_FOUND);

    let edit = app
        .request(
            "PATCH",
            &format!("/api/dependants/{mom}"),
            Some(json!({ "name": "Someone else" })),
            Some(&karim.token),
        )
        .await;
    assert_eq!(edit.status, StatusCode::NOT_FOUND);

    let list = app.request("GET", "/api/dependants", None, Some(&karim.token)).await;
    assert_eq!(list.body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_dependant_requires_a_name() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;

    let response = app
        .request(
            "POST",
            "/api/dependants",
            Some(json!({
                "name": "   ",
                "date_of_birth": "1952-03-14",
                "gender": "female",
                "location": "beirut_hamra",
                "full_address": "Hamra Street, Building 12",
            })),
            Some(&maya.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(response.body["message"], "Name is required");
}

#[tokio::test]
async fn test_malformed_dependant_body_is_a_validation_error() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;

    let missing_address = app
        .request(
            "POST",
            "/api/dependants",
            Some(json!({
                "name": "Nadia",
                "date_of_birth": "1952-03-14",
                "gender": "female",
                "location": "beirut_hamra",
            })),
            Some(&maya.token),
        )
        .await;
    assert_eq!(missing_address.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_address.body["success"], false);
    assert_eq!(missing_address.body["error"], "VALIDATION_ERROR");

    let mom = app.dependant(&maya, "Nadia").await;
    let unknown_location = app
        .request(
            "PATCH",
            &format!("/api/dependants/{mom}"),
            Some(json!({ "location": "atlantis" })),
            Some(&maya.token),
        )
        .await;
    assert_eq!(unknown_location.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_location.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_ignores_client_photo_url() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;

    let response = app
        .request(
            "POST",
            "/api/dependants",
            Some(json!({
                "name": "Nadia",
                "date_of_birth": "1952-03-14",
                "gender": "female",
                "location": "beirut_hamra",
                "full_address": "Hamra Street, Building 12",
                "photo_url": "https://elsewhere.example/tracker.png",
            })),
            Some(&maya.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body["data"]["photo_url"].is_null());
}

#[tokio::test]
async fn test_dossier_is_shared_with_the_assigned_dispatcher() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;
    let maya = app.customer("maya@example.com", "Maya").await;
    let karim = app.customer("karim@example.com", "Karim").await;
    let mom = app.dependant(&maya, "Nadia").await;

    let created = app.order(&maya, &mom, "wifi-fix").await;
    assert_eq!(created.status, StatusCode::CREATED);
    let request_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let dossier = app
        .request("GET", &format!("/api/requests/{request_id}/dossier"), None, Some(&rami.token))
        .await;
    assert_eq!(dossier.status, StatusCode::OK);
    assert_eq!(dossier.body["data"]["name"], "Nadia");
    assert_eq!(dossier.body["data"]["medical_conditions"], "Type 2 diabetes");

    let stranger = app
        .request("GET", &format!("/api/requests/{request_id}/dossier"), None, Some(&karim.token))
        .await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deleting_a_dependant_keeps_request_snapshot() {
    let app = TestApp::new();
    app.dispatcher("rami@wasil.test", "Rami", &["grocery"]).await;
    let maya = app.customer("maya@example.com", "Maya").await;
    let mom = app.dependant(&maya, "Nadia").await;

    let created = app.order(&maya, &mom, "grocery").await;
    let request_id = created.body["data"]["id"].as_str().unwrap().to_string();

    app.request("DELETE", &format!("/api/dependants/{mom}"), None, Some(&maya.token))
        .await;

    let request = app
        .request("GET", &format!("/api/requests/{request_id}"), None, Some(&maya.token))
        .await;
    assert_eq!(request.status, StatusCode::OK);
    assert_eq!(request.body["data"]["parent_name"], "Nadia");
    assert_eq!(request.body["data"]["location"], "beirut_hamra");
}

#[tokio::test]
async fn test_photo_upload_is_linked_and_served() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;
    let mom = app.dependant(&maya, "Nadia").await;

    let uploaded = upload(
        &app,
        &format!("/api/dependants/{mom}/photo"),
        &maya,
        "image/png",
        b"\x89PNG fake image bytes",
    )
    .await;
    assert_eq!(uploaded.status, StatusCode::CREATED, "{:?}", uploaded.body);
    let url = uploaded.body["data"]["url"].as_str().unwrap().to_string();
    let key = uploaded.body["data"]["key"].as_str().unwrap().to_string();
    assert!(url.starts_with("http://wasil.test/media/dependants/"));

    let profile = app
        .request("GET", &format!("/api/dependants/{mom}"), None, Some(&maya.token))
        .await;
    assert_eq!(profile.body["data"]["photo_url"], url.as_str());

    let served = app.request("GET", &format!("/media/{key}"), None, None).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.content_type, "image/png");
    assert_eq!(served.raw, b"\x89PNG fake image bytes".to_vec());
}

#[tokio::test]
async fn test_upload_rejects_unsupported_types_and_strangers() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;
    let karim = app.customer("karim@example.com", "Karim").await;
    let mom = app.dependant(&maya, "Nadia").await;
    let path = format!("/api/dependants/{mom}/photo");

    let script = upload(&app, &path, &maya, "application/x-sh", b"#!/bin/sh").await;
    assert_eq!(script.status, StatusCode::BAD_REQUEST);

    let stranger = upload(&app, &path, &karim, "image/png", b"png").await;
    assert_eq!(stranger.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dispatcher_uploads_own_field_photo() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;

    let uploaded = upload(
        &app,
        &format!("/api/dispatchers/{}/media/field", rami.id),
        &rami,
        "image/jpeg",
        b"jpeg bytes",
    )
    .await;
    assert_eq!(uploaded.status, StatusCode::CREATED, "{:?}", uploaded.body);

    let roster = app.request("GET", "/api/dispatchers", None, Some(&rami.token)).await;
    assert_eq!(roster.body["data"][0]["field_photo_url"], uploaded.body["data"]["url"]);

    let bad_slot = upload(
        &app,
        &format!("/api/dispatchers/{}/media/hologram", rami.id),
        &rami,
        "image/jpeg",
        b"jpeg bytes",
    )
    .await;
    assert_eq!(bad_slot.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_media_is_not_found() {
    let app = TestApp::new();
    let response = app.request("GET", "/media/dependants/nope/missing.png", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
