//! WebSocket handler
//!
//! Each upgraded socket runs three tasks: a reader that decodes and
//! dispatches client events, a writer that drains the outbound channel, and
//! a heartbeat that pings and enforces the idle timeout. When any of them
//! ends the connection is torn down.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::connection::Connection;
use crate::handlers::{DisconnectHandler, EventDispatcher};
use crate::protocol::{ClientEvent, Outbound};
use crate::server::GatewayState;

/// Channel buffer size for outgoing messages
const MESSAGE_BUFFER_SIZE: usize = 256;

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    // Create message channel for outgoing messages
    let (tx, mut rx) = mpsc::channel::<Outbound>(MESSAGE_BUFFER_SIZE);

    // Register connection
    let connection = state.connection_manager().add_connection(tx);
    let connection_id = connection.id().to_string();

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Spawn task to receive messages from WebSocket
    let state_recv = state.clone();
    let connection_recv = Arc::clone(&connection);
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    return;
                }
            };
            connection_recv.touch();

            match msg {
                Message::Text(text) => {
                    handle_text_message(&state_recv, &connection_recv, &text).await;
                }
                Message::Binary(_) => {
                    tracing::debug!(
                        connection_id = %connection_recv.id(),
                        "Binary frame ignored"
                    );
                }
                Message::Ping(_) | Message::Pong(_) => {
                    // Pong replies are handled automatically by axum
                    tracing::trace!(connection_id = %connection_recv.id(), "Keepalive received");
                }
                Message::Close(_) => {
                    tracing::info!(connection_id = %connection_recv.id(), "Client closed connection");
                    return;
                }
            }
        }
    });

    // Spawn task to send messages to WebSocket
    let connection_id_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let msg = match frame {
                Outbound::Text(body) => Message::Text(body.to_string()),
                Outbound::Ping => Message::Ping(Vec::new()),
            };
            if ws_sink.send(msg).await.is_err() {
                tracing::warn!(
                    connection_id = %connection_id_send,
                    "Failed to send message to WebSocket"
                );
                break;
            }
        }

        // Close the WebSocket when channel is closed
        let _ = ws_sink.close().await;
    });

    // Spawn heartbeat task
    let connection_hb = Arc::clone(&connection);
    let period = state.config().heartbeat_interval().max(Duration::from_millis(1));
    let timeout = state.config().heartbeat_timeout();
    let mut heartbeat_task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);

        loop {
            ticker.tick().await;

            let idle = connection_hb.idle_for();
            if idle > timeout {
                tracing::warn!(
                    connection_id = %connection_hb.id(),
                    idle_ms = u64::try_from(idle.as_millis()).unwrap_or(u64::MAX),
                    "Connection timed out"
                );
                break;
            }
            connection_hb.try_send(Outbound::Ping);
        }
    });

    // Wait for any task to complete, then stop the others
    tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(connection_id = %connection_id, "Receive task ended");
        }
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
        }
        _ = &mut heartbeat_task => {
            tracing::debug!(connection_id = %connection_id, "Heartbeat task ended");
        }
    }
    stop_tasks([recv_task, send_task, heartbeat_task]).await;

    // Clean up
    drop(connection);
    if let Err(e) = DisconnectHandler::handle(&state, &connection_id).await {
        tracing::error!(connection_id = %connection_id, error = %e, "Cleanup failed");
    }
}

/// Abort the socket tasks and wait until none of them is running
///
/// Cleanup must not overlap a handler that is still mid-event. A handle the
/// caller already awaited to completion is not polled again.
async fn stop_tasks<const N: usize>(tasks: [JoinHandle<()>; N]) {
    for task in &tasks {
        task.abort();
    }
    for task in tasks {
        if !task.is_finished() {
            let _ = task.await;
        }
    }
}

/// Handle a text frame from the client
///
/// Malformed frames and failed events are logged; the connection stays open.
async fn handle_text_message(state: &GatewayState, connection: &Arc<Connection>, text: &str) {
    let event = match ClientEvent::decode(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(
                connection_id = %connection.id(),
                error = %e,
                "Failed to parse frame"
            );
            return;
        }
    };

    let name = event.name();
    tracing::trace!(connection_id = %connection.id(), event = name, "Received event");

    if let Err(e) = EventDispatcher::dispatch(state, connection, event).await {
        if e.is_client_error() {
            tracing::warn!(connection_id = %connection.id(), event = name, error = %e, "Event rejected");
        } else {
            tracing::error!(connection_id = %connection.id(), event = name, error = %e, "Event failed");
        }
    }
}
