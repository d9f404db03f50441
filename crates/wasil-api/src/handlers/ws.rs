//! WebSocket upgrade handler.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use wasil_realtime::OutboundMessage;
use wasil_service::RequestContext;

use crate::error::ApiError;
use crate::extractors::auth::context_from_token;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// Session token.
    pub token: String,
}

/// GET /ws?token={jwt}: WebSocket upgrade
pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    // Authenticate before upgrade
    let ctx = context_from_token(&state, &query.token)?;
    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, ctx, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, ctx: RequestContext, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let connections = state.realtime.connections.clone();
    let (handle, mut outbound_rx) = connections.register(ctx.user_id.into_uuid(), ctx.role);
    let conn_id = handle.id;

    info!(conn_id = %conn_id, user_id = %ctx.user_id, "WebSocket connection established");

    let ping_every = Duration::from_secs(state.config.realtime.ping_interval_seconds.max(1));
    let outbound_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ping_every);
        ticker.tick().await;
        loop {
            let msg = tokio::select! {
                msg = outbound_rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
                _ = ticker.tick() => OutboundMessage::Ping { timestamp: Utc::now().timestamp() },
            };
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to encode outbound message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => connections.handle_inbound(&conn_id, text.as_str()),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    connections.unregister(&conn_id);

    info!(conn_id = %conn_id, user_id = %ctx.user_id, "WebSocket connection closed");
}
