//! Integration tests for live request views and WebSocket channel fan-out.

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use tokio::time::timeout;

use helpers::TestApp;
use wasil_core::types::UserId;
use wasil_entity::request::RequestStatus;
use wasil_entity::user::UserRole;
use wasil_realtime::{OutboundMessage, ViewKey};

const WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_customer_view_follows_lifecycle() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;
    let maya = app.customer("maya@example.com", "Maya").await;
    let mom = app.dependant(&maya, "Nadia").await;

    let mut view = app
        .state
        .realtime
        .projections
        .open(ViewKey::ByCustomer(UserId::from_uuid(maya.id)))
        .await
        .unwrap();
    assert!(view.is_empty());

    let created = app.order(&maya, &mom, "wifi-fix").await;
    assert_eq!(created.status, StatusCode::CREATED);
    let request_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let seen = timeout(WAIT, view.wait_until(|records| records.len() == 1)).await;
    assert_eq!(seen, Ok(true));
    assert_eq!(view.snapshot()[0].status, RequestStatus::Assigned);

    app.request(
        "POST",
        &format!("/api/requests/{request_id}/status"),
        Some(serde_json::json!({ "status": "IN_PROGRESS" })),
        Some(&rami.token),
    )
    .await;

    let advanced = timeout(
        WAIT,
        view.wait_until(|records| records.first().is_some_and(|r| r.status == RequestStatus::InProgress)),
    )
    .await;
    assert_eq!(advanced, Ok(true));
    assert_eq!(view.len(), 1);
}

#[tokio::test]
async fn test_view_starts_from_stored_requests() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["grocery"]).await;
    let maya = app.customer("maya@example.com", "Maya").await;
    let mom = app.dependant(&maya, "Nadia").await;
    app.order(&maya, &mom, "grocery").await;
    app.order(&maya, &mom, "grocery").await;

    let dispatcher_view = app
        .state
        .realtime
        .projections
        .open(ViewKey::ByDispatcher(UserId::from_uuid(rami.id)))
        .await
        .unwrap();
    assert_eq!(dispatcher_view.len(), 2);

    let global = app.state.realtime.projections.open(ViewKey::Global).await.unwrap();
    assert_eq!(global.len(), 2);
}

#[tokio::test]
async fn test_open_views_receive_new_requests() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["grocery"]).await;
    let maya = app.customer("maya@example.com", "Maya").await;
    let mom = app.dependant(&maya, "Nadia").await;

    let projections = &app.state.realtime.projections;
    let mut customer_view = projections
        .open(ViewKey::ByCustomer(UserId::from_uuid(maya.id)))
        .await
        .unwrap();
    let mut dispatcher_view = projections
        .open(ViewKey::ByDispatcher(UserId::from_uuid(rami.id)))
        .await
        .unwrap();
    assert!(customer_view.is_empty());
    assert!(dispatcher_view.is_empty());

    assert_eq!(app.order(&maya, &mom, "grocery").await.status, StatusCode::CREATED);
    assert_eq!(app.order(&maya, &mom, "grocery").await.status, StatusCode::CREATED);

    let customer_seen = timeout(WAIT, customer_view.wait_until(|records| records.len() == 2)).await;
    assert_eq!(customer_seen, Ok(true));
    let dispatcher_seen = timeout(WAIT, dispatcher_view.wait_until(|records| records.len() == 2)).await;
    assert_eq!(dispatcher_seen, Ok(true));

    let records = dispatcher_view.snapshot();
    assert!(records.iter().all(|r| r.status == RequestStatus::Assigned));
    assert!(records.iter().all(|r| r.parent_name == "Nadia"));
}

#[tokio::test]
async fn test_views_ignore_other_customers() {
    let app = TestApp::new();
    app.dispatcher("rami@wasil.test", "Rami", &["grocery"]).await;
    let maya = app.customer("maya@example.com", "Maya").await;
    let karim = app.customer("karim@example.com", "Karim").await;
    let mom = app.dependant(&maya, "Nadia").await;
    let dad = app.dependant(&karim, "Fouad").await;

    let mut view = app
        .state
        .realtime
        .projections
        .open(ViewKey::ByCustomer(UserId::from_uuid(karim.id)))
        .await
        .unwrap();

    app.order(&maya, &mom, "grocery").await;
    app.order(&karim, &dad, "grocery").await;

    let seen = timeout(WAIT, view.wait_until(|records| !records.is_empty())).await;
    assert_eq!(seen, Ok(true));
    let records = view.snapshot();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].parent_name, "Fouad");
}

#[tokio::test]
async fn test_reopening_a_view_closes_the_old_one() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;
    let key = ViewKey::ByCustomer(UserId::from_uuid(maya.id));
    let projections = &app.state.realtime.projections;

    let mut first = projections.open(key).await.unwrap();
    let _second = projections.open(key).await.unwrap();
    assert_eq!(projections.open_count(), 1);

    let still_open = timeout(WAIT, first.changed()).await;
    assert_eq!(still_open, Ok(false));

    assert!(projections.close(key));
    assert!(!projections.close(key));
}

#[tokio::test]
async fn test_connection_receives_its_own_channels() {
    let app = TestApp::new();
    app.dispatcher("rami@wasil.test", "Rami", &["leak-repair"]).await;
    let maya = app.customer("maya@example.com", "Maya").await;
    let mom = app.dependant(&maya, "Nadia").await;

    let connections = &app.state.realtime.connections;
    let (handle, mut rx) = connections.register(maya.id, UserRole::Customer);

    let mut joined = Vec::new();
    for _ in 0..2 {
        match timeout(WAIT, rx.recv()).await {
            Ok(Some(OutboundMessage::Subscribed { channel })) => joined.push(channel),
            other => panic!("expected subscription ack, got {other:?}"),
        }
    }
    assert!(joined.contains(&format!("customer:{}", maya.id)));
    assert!(joined.contains(&format!("mailbox:{}", maya.id)));

    app.order(&maya, &mom, "leak-repair").await;

    let mut channels = Vec::new();
    while channels.len() < 2 {
        match timeout(WAIT, rx.recv()).await {
            Ok(Some(OutboundMessage::Event { channel, .. })) => channels.push(channel),
            Ok(Some(_)) => {}
            other => panic!("expected event, got {other:?}"),
        }
    }
    assert!(channels.contains(&format!("customer:{}", maya.id)));
    assert!(channels.contains(&format!("mailbox:{}", maya.id)));

    connections.unregister(&handle.id);
    assert_eq!(connections.connection_count(), 0);
}

#[tokio::test]
async fn test_customer_cannot_join_admin_feed() {
    let app = TestApp::new();
    let maya = app.customer("maya@example.com", "Maya").await;
    let connections = &app.state.realtime.connections;
    let (handle, mut rx) = connections.register(maya.id, UserRole::Customer);
    for _ in 0..2 {
        timeout(WAIT, rx.recv()).await.unwrap();
    }

    connections.handle_inbound(&handle.id, r#"{"type":"subscribe","channel":"admin:requests"}"#);
    match timeout(WAIT, rx.recv()).await {
        Ok(Some(OutboundMessage::Error { code, .. })) => assert_eq!(code, "forbidden"),
        other => panic!("expected forbidden, got {other:?}"),
    }

    connections.handle_inbound(&handle.id, "not json");
    match timeout(WAIT, rx.recv()).await {
        Ok(Some(OutboundMessage::Error { code, .. })) => assert_eq!(code, "bad_message"),
        other => panic!("expected bad_message, got {other:?}"),
    }
}
