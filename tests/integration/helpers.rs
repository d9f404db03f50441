//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use wasil_api::{AppState, build_app};
use wasil_auth::RegistrationInput;
use wasil_core::AppResult;
use wasil_core::config::AppConfig;
use wasil_core::types::UserId;
use wasil_database::Stores;
use wasil_entity::catalog::ServiceId;
use wasil_entity::dispatcher::CreateDispatcher;
use wasil_entity::user::{SubscriptionPlan, UserRole};
use wasil_service::{RequestContext, TextGenerator};
use wasil_storage::providers::MemoryStorageProvider;

/// Password accepted by the strength policy.
pub const PASSWORD: &str = "Cedar-Harbor-Lantern-91";

/// Generator that always answers with the same sentence.
#[derive(Debug)]
pub struct ScriptedGenerator(pub &'static str);

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> AppResult<String> {
        Ok(self.0.to_string())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Wired services, for setup that has no HTTP route
    pub state: AppState,
}

/// A signed-in account.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub token: String,
}

impl TestApp {
    /// Create a test application on the in-memory store.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with custom settings.
    pub fn with_config(mut config: AppConfig) -> Self {
        config.auth.jwt_secret = "integration-test-secret-0123456789".to_string();
        config.server.public_url = "http://wasil.test".to_string();
        let generator: Arc<dyn TextGenerator> =
            Arc::new(ScriptedGenerator("Rami is with your mother now. Everything is under control."));
        let state = AppState::assemble(
            config,
            Stores::memory(),
            None,
            Arc::new(MemoryStorageProvider::new()),
            Some(generator),
        );
        let router = build_app(state.clone());
        Self { router, state }
    }

    /// Register, verify, and log in a customer over HTTP.
    pub async fn customer(&self, email: &str, name: &str) -> Account {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({ "email": email, "password": PASSWORD, "name": name })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let token = response.body["data"]["verification_token"]
            .as_str()
            .expect("verification token")
            .to_string();

        let response = self
            .request("POST", "/api/auth/verify", Some(json!({ "token": token })), None)
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        self.login(email).await
    }

    /// Create a verified administrator and log in.
    pub async fn admin(&self, email: &str) -> Account {
        self.account_with_role(email, "Operations", UserRole::Admin).await;
        self.login(email).await
    }

    /// Create a verified dispatcher listed in the directory and log in.
    pub async fn dispatcher(&self, email: &str, name: &str, services: &[&str]) -> Account {
        let id = self.account_with_role(email, name, UserRole::Dispatcher).await;
        let ops = RequestContext::new(UserId::from_uuid(Uuid::nil()), UserRole::Admin, "Operations");
        self.state
            .directory
            .register(
                &ops,
                CreateDispatcher {
                    id,
                    name: name.to_string(),
                    role_title: "Field Dispatcher".to_string(),
                    rating: 4.8,
                    certifications: vec!["First Aid Trained".to_string()],
                    photo_url: None,
                    field_photo_url: None,
                    working_video_url: None,
                    supported_service_ids: services.iter().map(|s| ServiceId::new(*s)).collect(),
                },
            )
            .await
            .expect("register dispatcher");
        self.login(email).await
    }

    async fn account_with_role(&self, email: &str, name: &str, role: UserRole) -> UserId {
        let registration = self
            .state
            .identity
            .register_with_role(
                RegistrationInput {
                    email: email.to_string(),
                    password: PASSWORD.to_string(),
                    name: name.to_string(),
                    phone: None,
                    country: None,
                    address: None,
                    plan: SubscriptionPlan::default(),
                },
                role,
            )
            .await
            .expect("register account");
        self.state
            .identity
            .verify_email(&registration.verification_token)
            .await
            .expect("verify account")
            .id
    }

    /// Login and return the signed-in account.
    pub async fn login(&self, email: &str) -> Account {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": email, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "Login failed: {:?}", response.body);
        Account {
            id: response.body["data"]["user"]["id"]
                .as_str()
                .and_then(|s| s.parse().ok())
                .expect("user id"),
            token: response.body["data"]["token"]
                .as_str()
                .expect("No token in login response")
                .to_string(),
        }
    }

    /// Add a dependant for `owner` and return its id.
    pub async fn dependant(&self, owner: &Account, name: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/dependants",
                Some(json!({
                    "name": name,
                    "date_of_birth": "1952-03-14",
                    "gender": "female",
                    "location": "beirut_hamra",
                    "full_address": "Makdessi Street, Building 12, 3rd floor",
                    "medical_conditions": "Type 2 diabetes",
                    "medications": ["Metformin"],
                })),
                Some(&owner.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"].as_str().expect("dependant id").to_string()
    }

    /// Customer price of a catalog offering, in cents.
    pub fn quote(&self, service_id: &str) -> i64 {
        let catalog = &self.state.catalog;
        let offering = catalog.get(&ServiceId::new(service_id)).expect("offering");
        catalog.quote(offering).cents()
    }

    /// Order `service_id` for a dependant at the quoted price.
    pub async fn order(&self, customer: &Account, dependant_id: &str, service_id: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/requests",
            Some(json!({
                "dependant_id": dependant_id,
                "service_id": service_id,
                "urgent_notes": "Please call before arriving.",
                "price": self.quote(service_id),
            })),
            Some(&customer.token),
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let req = req.body(Body::from(body_str)).expect("Failed to build request");
        self.send(req).await
    }

    /// Send a prepared request.
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body_bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            content_type,
            body,
            raw: body_bytes.to_vec(),
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content type header
    pub content_type: String,
    /// Parsed JSON body (`Null` for non-JSON bodies)
    pub body: Value,
    /// Raw body bytes
    pub raw: Vec<u8>,
}
