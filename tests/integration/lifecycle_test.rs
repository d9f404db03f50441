//! Integration tests for the service request lifecycle.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_request_runs_to_completion() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;
    let lina = app.customer("lina@example.com", "Lina").await;
    let mother = app.dependant(&lina, "Mariam").await;

    let response = app.order(&lina, &mother, "wifi-fix").await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let request = &response.body["data"];
    assert_eq!(request["status"], "ASSIGNED");
    assert_eq!(request["assigned_dispatcher_id"], rami.id.to_string());
    assert_eq!(request["parent_name"], "Mariam");
    assert_eq!(request["price"], 3000);
    assert_eq!(request["payout"], 2000);
    let id = request["id"].as_str().unwrap().to_string();

    let queue = app.request("GET", "/api/dispatcher/queue", None, Some(&rami.token)).await;
    assert_eq!(queue.status, StatusCode::OK);
    assert_eq!(queue.body["data"][0]["id"], id.as_str());

    let started = app
        .request(
            "POST",
            &format!("/api/requests/{id}/status"),
            Some(json!({ "status": "IN_PROGRESS" })),
            Some(&rami.token),
        )
        .await;
    assert_eq!(started.status, StatusCode::OK, "{:?}", started.body);
    assert_eq!(started.body["data"]["status"], "IN_PROGRESS");
    assert_eq!(
        started.body["data"]["ai_reassurance"],
        "Rami is with your mother now. Everything is under control."
    );

    let done = app
        .request(
            "POST",
            &format!("/api/requests/{id}/status"),
            Some(json!({ "status": "COMPLETED" })),
            Some(&rami.token),
        )
        .await;
    assert_eq!(done.status, StatusCode::OK);
    assert_eq!(done.body["data"]["status"], "COMPLETED");

    let seen = app.request("GET", &format!("/api/requests/{id}"), None, Some(&lina.token)).await;
    assert_eq!(seen.body["data"]["status"], "COMPLETED");
}

#[tokio::test]
async fn test_terminal_and_skipping_transitions_are_rejected() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;
    let lina = app.customer("lina@example.com", "Lina").await;
    let mother = app.dependant(&lina, "Mariam").await;
    let id = app.order(&lina, &mother, "wifi-fix").await.body["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let path = format!("/api/requests/{id}/status");

    let skip = app
        .request("POST", &path, Some(json!({ "status": "COMPLETED" })), Some(&rami.token))
        .await;
    assert_eq!(skip.status, StatusCode::CONFLICT);
    assert_eq!(skip.body["error"], "INVALID_TRANSITION");

    for status in ["IN_PROGRESS", "COMPLETED"] {
        let r = app
            .request("POST", &path, Some(json!({ "status": status })), Some(&rami.token))
            .await;
        assert_eq!(r.status, StatusCode::OK);
    }

    let back = app
        .request("POST", &path, Some(json!({ "status": "IN_PROGRESS" })), Some(&rami.token))
        .await;
    assert_eq!(back.status, StatusCode::CONFLICT);

    let cancel = app
        .request(
            "POST",
            &format!("/api/requests/{id}/cancel"),
            Some(json!({ "reason": "Changed my mind" })),
            Some(&lina.token),
        )
        .await;
    assert_eq!(cancel.status, StatusCode::CONFLICT);
    assert_eq!(cancel.body["error"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_only_assigned_dispatcher_or_admin_may_advance() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;
    let lina = app.customer("lina@example.com", "Lina").await;
    let mother = app.dependant(&lina, "Mariam").await;
    let id = app.order(&lina, &mother, "wifi-fix").await.body["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Registered after the order, so never assigned.
    let samer = app.dispatcher("samer@wasil.test", "Samer", &["solar-check"]).await;
    let admin = app.admin("ops@wasil.test").await;
    let path = format!("/api/requests/{id}/status");
    let body = json!({ "status": "IN_PROGRESS" });

    let by_customer = app.request("POST", &path, Some(body.clone()), Some(&lina.token)).await;
    assert_eq!(by_customer.status, StatusCode::FORBIDDEN);

    let by_other = app.request("POST", &path, Some(body.clone()), Some(&samer.token)).await;
    assert_eq!(by_other.status, StatusCode::FORBIDDEN);

    let by_admin = app.request("POST", &path, Some(body), Some(&admin.token)).await;
    assert_eq!(by_admin.status, StatusCode::OK);
    assert_eq!(by_admin.body["data"]["assigned_dispatcher_id"], rami.id.to_string());

    let notes = app.request("GET", "/api/notifications", None, Some(&lina.token)).await;
    assert_eq!(notes.body["data"]["items"][0]["title"], "Mission In Progress");
    assert_eq!(
        notes.body["data"]["items"][0]["message"],
        "Operations has updated your Wi-Fi Troubleshooting request to In Progress."
    );
}

#[tokio::test]
async fn test_customer_cancellation_applies_fee() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;
    let lina = app.customer("lina@example.com", "Lina").await;
    let mother = app.dependant(&lina, "Mariam").await;
    let id = app.order(&lina, &mother, "wifi-fix").await.body["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let path = format!("/api/requests/{id}/cancel");

    let blank = app
        .request("POST", &path, Some(json!({ "reason": "   " })), Some(&lina.token))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let cancelled = app
        .request(
            "POST",
            &path,
            Some(json!({ "reason": "  Neighbour already fixed it  " })),
            Some(&lina.token),
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK, "{:?}", cancelled.body);
    assert_eq!(cancelled.body["data"]["status"], "CANCELLED");
    assert_eq!(cancelled.body["data"]["price"], 1500);
    assert_eq!(cancelled.body["data"]["cancellation_reason"], "Neighbour already fixed it");

    let again = app
        .request("POST", &path, Some(json!({ "reason": "twice" })), Some(&lina.token))
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let advance = app
        .request(
            "POST",
            &format!("/api/requests/{id}/status"),
            Some(json!({ "status": "IN_PROGRESS" })),
            Some(&rami.token),
        )
        .await;
    assert_eq!(advance.status, StatusCode::CONFLICT);

    let mailbox = app.request("GET", "/api/notifications", None, Some(&lina.token)).await;
    assert_eq!(mailbox.body["data"]["items"][0]["title"], "Request Cancelled");
}

#[tokio::test]
async fn test_malformed_bodies_use_the_error_envelope() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;
    let lina = app.customer("lina@example.com", "Lina").await;
    let mother = app.dependant(&lina, "Mariam").await;
    let id = app.order(&lina, &mother, "wifi-fix").await.body["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let no_reason = app
        .request("POST", &format!("/api/requests/{id}/cancel"), Some(json!({})), Some(&lina.token))
        .await;
    assert_eq!(no_reason.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_reason.body["success"], false);
    assert_eq!(no_reason.body["error"], "VALIDATION_ERROR");

    let empty_reason = app
        .request(
            "POST",
            &format!("/api/requests/{id}/cancel"),
            Some(json!({ "reason": "" })),
            Some(&lina.token),
        )
        .await;
    assert_eq!(empty_reason.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty_reason.body["error"], "VALIDATION_ERROR");

    let status_path = format!("/api/requests/{id}/status");
    let unknown = app
        .request("POST", &status_path, Some(json!({ "status": "PAUSED" })), Some(&rami.token))
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.body["error"], "VALIDATION_ERROR");

    let backwards = app
        .request("POST", &status_path, Some(json!({ "status": "REQUESTED" })), Some(&rami.token))
        .await;
    assert_eq!(backwards.status, StatusCode::BAD_REQUEST);
    assert_eq!(backwards.body["error"], "VALIDATION_ERROR");

    let not_json = app
        .request("POST", "/api/requests", Some(json!("wifi please")), Some(&lina.token))
        .await;
    assert_eq!(not_json.status, StatusCode::BAD_REQUEST);
    assert_eq!(not_json.body["error"], "VALIDATION_ERROR");

    let current = app.request("GET", &format!("/api/requests/{id}"), None, Some(&lina.token)).await;
    assert_eq!(current.body["data"]["status"], "ASSIGNED");
}

#[tokio::test]
async fn test_dispatcher_cannot_cancel_but_admin_can() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;
    let admin = app.admin("ops@wasil.test").await;
    let lina = app.customer("lina@example.com", "Lina").await;
    let mother = app.dependant(&lina, "Mariam").await;
    let id = app.order(&lina, &mother, "wifi-fix").await.body["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let path = format!("/api/requests/{id}/status");

    let by_dispatcher = app
        .request("POST", &path, Some(json!({ "status": "CANCELLED" })), Some(&rami.token))
        .await;
    assert_eq!(by_dispatcher.status, StatusCode::FORBIDDEN);

    let by_admin = app
        .request("POST", &path, Some(json!({ "status": "CANCELLED" })), Some(&admin.token))
        .await;
    assert_eq!(by_admin.status, StatusCode::OK);
    assert_eq!(by_admin.body["data"]["cancellation_reason"], "Cancelled by operations");
}

#[tokio::test]
async fn test_stale_price_is_rejected() {
    let app = TestApp::new();
    app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;
    let lina = app.customer("lina@example.com", "Lina").await;
    let mother = app.dependant(&lina, "Mariam").await;

    let response = app
        .request(
            "POST",
            "/api/requests",
            Some(json!({ "dependant_id": mother, "service_id": "wifi-fix", "price": 2000 })),
            Some(&lina.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_custom_request_needs_a_title() {
    let app = TestApp::new();
    app.dispatcher("rami@wasil.test", "Rami", &[]).await;
    let lina = app.customer("lina@example.com", "Lina").await;
    let mother = app.dependant(&lina, "Mariam").await;
    let price = app.quote("custom-request");

    let untitled = app
        .request(
            "POST",
            "/api/requests",
            Some(json!({ "dependant_id": mother, "service_id": "custom-request", "price": price })),
            Some(&lina.token),
        )
        .await;
    assert_eq!(untitled.status, StatusCode::BAD_REQUEST);

    let titled = app
        .request(
            "POST",
            "/api/requests",
            Some(json!({
                "dependant_id": mother,
                "service_id": "custom-request",
                "price": price,
                "custom_title": "Accompany to the bank",
            })),
            Some(&lina.token),
        )
        .await;
    assert_eq!(titled.status, StatusCode::CREATED);
    assert_eq!(titled.body["data"]["title"], "Accompany to the bank");
    assert_eq!(titled.body["data"]["is_custom"], true);
}

#[tokio::test]
async fn test_empty_directory_writes_nothing() {
    let app = TestApp::new();
    let lina = app.customer("lina@example.com", "Lina").await;
    let mother = app.dependant(&lina, "Mariam").await;

    let response = app.order(&lina, &mother, "wifi-fix").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);

    let mine = app.request("GET", "/api/requests", None, Some(&lina.token)).await;
    assert_eq!(mine.body["data"].as_array().map(Vec::len), Some(0));

    let unread = app
        .request("GET", "/api/notifications/unread-count", None, Some(&lina.token))
        .await;
    // Only the welcome note from verification.
    assert_eq!(unread.body["data"]["count"], 1);
}

#[tokio::test]
async fn test_requests_are_hidden_from_strangers() {
    let app = TestApp::new();
    app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix"]).await;
    let lina = app.customer("lina@example.com", "Lina").await;
    let karim = app.customer("karim@example.com", "Karim").await;
    let mother = app.dependant(&lina, "Mariam").await;
    let id = app.order(&lina, &mother, "wifi-fix").await.body["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let peek = app.request("GET", &format!("/api/requests/{id}"), None, Some(&karim.token)).await;
    assert_eq!(peek.status, StatusCode::NOT_FOUND);

    let order_for_her_mother = app.order(&karim, &mother, "wifi-fix").await;
    assert_eq!(order_for_her_mother.status, StatusCode::NOT_FOUND);
    assert_eq!(order_for_her_mother.body["error"], "NOT_FOUND");

    let anonymous = app.request("GET", "/api/requests", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_overview_tracks_money() {
    let app = TestApp::new();
    let rami = app.dispatcher("rami@wasil.test", "Rami", &["wifi-fix", "grocery"]).await;
    let admin = app.admin("ops@wasil.test").await;
    let lina = app.customer("lina@example.com", "Lina").await;
    let mother = app.dependant(&lina, "Mariam").await;

    let wifi = app.order(&lina, &mother, "wifi-fix").await.body["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    app.order(&lina, &mother, "grocery").await;
    for status in ["IN_PROGRESS", "COMPLETED"] {
        app.request(
            "POST",
            &format!("/api/requests/{wifi}/status"),
            Some(json!({ "status": status })),
            Some(&rami.token),
        )
        .await;
    }

    let overview = app.request("GET", "/api/admin/overview", None, Some(&admin.token)).await;
    assert_eq!(overview.status, StatusCode::OK);
    let data = &overview.body["data"];
    assert_eq!(data["total_requests"], 2);
    assert_eq!(data["by_status"]["COMPLETED"], 1);
    assert_eq!(data["by_status"]["ASSIGNED"], 1);
    assert_eq!(data["gross_revenue"], 6000);
    assert_eq!(data["payouts_owed"], 2000);

    let filtered = app
        .request("GET", "/api/admin/requests?status=ASSIGNED", None, Some(&admin.token))
        .await;
    assert_eq!(filtered.body["data"]["items"].as_array().map(Vec::len), Some(1));

    let denied = app.request("GET", "/api/admin/overview", None, Some(&lina.token)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}
