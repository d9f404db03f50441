//! Route definitions for the Wasil HTTP API.
//!
//! REST routes are organized by domain and mounted under `/api`. Media
//! downloads live under `/media` and the WebSocket upgrade at `/ws`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Multipart framing on top of the configured upload limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.storage.max_upload_size_bytes as usize + MULTIPART_OVERHEAD;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(dependant_routes())
        .merge(request_routes())
        .merge(dispatcher_routes())
        .merge(notification_routes())
        .merge(admin_routes())
        .merge(health_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::timeout::request_timeout,
        ));

    let public_routes = Router::new()
        .route("/media/{*key}", get(handlers::media::serve_media))
        .route("/ws", get(handlers::ws::ws_handler));

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Sign-up, verification, login, and the caller's profile
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/verify", post(handlers::auth::verify_email))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/auth/me",
            get(handlers::auth::me).patch(handlers::auth::update_me),
        )
        .route("/me/photo", post(handlers::media::upload_profile_photo))
}

fn catalog_routes() -> Router<AppState> {
    Router::new().route("/catalog", get(handlers::catalog::list_catalog))
}

/// Parent profiles owned by the caller
fn dependant_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/dependants",
            get(handlers::dependant::list_dependants).post(handlers::dependant::create_dependant),
        )
        .route(
            "/dependants/{id}",
            get(handlers::dependant::get_dependant)
                .patch(handlers::dependant::update_dependant)
                .delete(handlers::dependant::delete_dependant),
        )
        .route(
            "/dependants/{id}/photo",
            post(handlers::media::upload_dependant_photo),
        )
}

/// Ordering and tracking service requests
fn request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/requests",
            get(handlers::request::list_my_requests).post(handlers::request::create_request),
        )
        .route("/requests/{id}", get(handlers::request::get_request))
        .route("/requests/{id}/cancel", post(handlers::request::cancel_request))
        .route("/requests/{id}/status", post(handlers::request::change_status))
        .route("/requests/{id}/dossier", get(handlers::request::mission_dossier))
}

fn dispatcher_routes() -> Router<AppState> {
    Router::new()
        .route("/dispatcher/queue", get(handlers::dispatcher::my_queue))
        .route("/dispatchers", get(handlers::dispatcher::list_dispatchers))
        .route("/dispatchers/active", get(handlers::dispatcher::active_for_me))
        .route(
            "/dispatchers/{id}/media/{slot}",
            post(handlers::media::upload_dispatcher_media),
        )
}

/// Mailbox
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list_notifications))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route("/notifications/{id}/read", post(handlers::notification::mark_read))
}

/// Administrator console
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/requests", get(handlers::admin::list_requests))
        .route("/admin/overview", get(handlers::admin::overview))
        .route("/admin/users", get(handlers::admin::list_users))
        .route("/admin/dispatchers", post(handlers::admin::register_dispatcher))
        .route(
            "/admin/dispatchers/{id}/active",
            patch(handlers::admin::set_dispatcher_active),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
