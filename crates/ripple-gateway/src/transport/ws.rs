//! WebSocket endpoint.
//!
//! Responsibilities:
//! - Resolve the caller's identity before upgrading (401 on failure)
//! - Upgrade HTTP -> WS with the configured read limit
//! - Register the connection, run its pumps, mark presence on both ends

use std::sync::Arc;

use axum::{
    extract::{ws::WebSocket, ws::WebSocketUpgrade, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use serde::Deserialize;
use tracing::Instrument;

use crate::app_state::AppState;
use crate::realtime::Connection;
use crate::transport::pump;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub ticket: String,
}

pub async fn ws_upgrade(
    State(app): State<AppState>,
    ws: WebSocketUpgrade,
    Query(q): Query<WsQuery>,
) -> Response {
    let user = match app.identity().resolve(&q.ticket) {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!(error = %e, "websocket upgrade rejected");
            return (StatusCode::UNAUTHORIZED, e.client_code().as_str()).into_response();
        }
    };

    let max = app.cfg().gateway.max_message_bytes;
    ws.max_message_size(max)
        .max_frame_size(max)
        .on_upgrade(move |socket| run_session(app, user, socket))
}

async fn run_session(app: AppState, user: String, socket: WebSocket) {
    let gw = &app.cfg().gateway;
    let (conn, outbox) = Connection::new(user, gw.outbound_queue);
    let cfg = gw.pump_config();
    let span = tracing::info_span!("session", conn = %conn.id(), user = conn.user());

    async move {
        let hub = app.hub();
        hub.register(Arc::clone(&conn));
        app.status().connected(conn.user()).await;
        tracing::info!("websocket connection established");

        let (sink, stream) = socket.split();
        pump::run(Arc::clone(&hub), Arc::clone(&conn), outbox, sink, stream, cfg).await;

        app.status().disconnected(conn.user()).await;
        tracing::info!("websocket connection closed");
    }
    .instrument(span)
    .await
}
