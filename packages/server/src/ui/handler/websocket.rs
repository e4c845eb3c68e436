//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, IdFactory},
    infrastructure::connection::Outbound,
    ui::{
        gateway::ConnectRole,
        state::{AppState, ConnectQuery},
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let role = match query.role() {
        Ok(role) => role,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let connection_id = IdFactory::connection_id();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, role)))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    role: Option<ConnectRole>,
) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive messages
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.gateway.connect(&connection_id, tx, role).await;

    // Spawn a task to receive frames from this client
    let gateway = state.gateway.clone();
    let reader_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", reader_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text from '{}': {}", reader_id, text);
                    gateway.handle_frame(&reader_id, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", reader_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward queued events to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.gateway.disconnect(&connection_id).await;
    tracing::info!("Connection '{}' closed", connection_id);
}
