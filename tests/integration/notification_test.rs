//! Integration tests for the notification mailbox.

mod helpers;

use axum::http::StatusCode;

use helpers::TestApp;

#[tokio::test]
async fn test_dispatch_lands_in_customer_mailbox() {
    let app = TestApp::new();
    app.dispatcher("rami@wasil.test", "Rami", &["medication"]).await;
    let maya = app.customer("maya@example.com", "Maya").await;
    let mom = app.dependant(&maya, "Nadia").await;

    let created = app.order(&maya, &mom, "medication").await;
    assert_eq!(created.status, StatusCode::CREATED);
    let request_id = created.body["data"]["id"].clone();

    let mailbox = app.request("GET", "/api/notifications", None, Some(&maya.token)).await;
    assert_eq!(mailbox.status, StatusCode::OK);
    assert_eq!(mailbox.body["data"]["total_items"], 2);
    let latest = &mailbox.body["data"]["items"][0];
    assert_eq!(latest["title"], "Dispatched");
    assert_eq!(latest["message"], "Medication Delivery for Nadia assigned to Rami.");
    assert_eq!(latest["request_id"], request_id);
    assert_eq!(latest["read"], false);

    let unread = app
        .request("GET", "/api/notifications/unread-count", None, Some(&maya.token))
        .await;
    assert_eq!(unread.body["data"]["count"], 2);
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;

    let mailbox = app.request("GET", "/api/notifications", None, Some(&maya.token)).await;
    let id = mailbox.body["data"]["items"][0]["id"].as_str().unwrap().to_string();

    let first = app
        .request("POST", &format!("/api/notifications/{id}/read"), None, Some(&maya.token))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["read"], true);
    let read_at = first.body["data"]["read_at"].clone();
    assert!(!read_at.is_null());

    let second = app
        .request("POST", &format!("/api/notifications/{id}/read"), None, Some(&maya.token))
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["data"]["read_at"], read_at);

    let unread = app
        .request("GET", "/api/notifications/unread-count", None, Some(&maya.token))
        .await;
    assert_eq!(unread.body["data"]["count"], 0);
}

#[tokio::test]
async fn test_mailboxes_are_private() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;
    let karim = app.customer("karim@example.com", "Karim").await;

    let mailbox = app.request("GET", "/api/notifications", None, Some(&maya.token)).await;
    let id = mailbox.body["data"]["items"][0]["id"].as_str().unwrap().to_string();

    let response = app
        .request("POST", &format!("/api/notifications/{id}/read"), None, Some(&karim.token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let still_unread = app
        .request("GET", "/api/notifications/unread-count", None, Some(&maya.token))
        .await;
    assert_eq!(still_unread.body["data"]["count"], 1);
}

#[tokio::test]
async fn test_mailbox_pages() {
    let app = TestApp::new();
    app.dispatcher("rami@wasil.test", "Rami", &["grocery"]).await;
    let maya = app.customer("maya@example.com", "Maya").await;
    let mom = app.dependant(&maya, "Nadia").await;
    for _ in 0..3 {
        app.order(&maya, &mom, "grocery").await;
    }

    let page = app
        .request("GET", "/api/notifications?page=2&per_page=3", None, Some(&maya.token))
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["data"]["total_items"], 4);
    assert_eq!(page.body["data"]["total_pages"], 2);
    let items = page.body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Welcome to Wasil");
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;
    let admin = app.admin("ops@wasil.test").await;

    let mailbox = app
        .request(
            "GET",
            "/api/notifications?page=18446744073709551615&per_page=100",
            None,
            Some(&maya.token),
        )
        .await;
    assert_eq!(mailbox.status, StatusCode::OK);
    assert_eq!(mailbox.body["data"]["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(mailbox.body["data"]["total_items"], 1);
    assert_eq!(mailbox.body["data"]["has_next"], false);

    let requests = app
        .request("GET", "/api/admin/requests?page=18446744073709551615", None, Some(&admin.token))
        .await;
    assert_eq!(requests.status, StatusCode::OK);
    assert_eq!(requests.body["data"]["items"].as_array().map(Vec::len), Some(0));
}
