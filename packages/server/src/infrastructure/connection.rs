//! Registry of live WebSocket connections and outbound delivery.
//!
//! Each connection owns an unbounded channel drained by its socket writer
//! task, so sending never waits on a slow client.

use std::collections::HashMap;

use tokio::sync::{Mutex, mpsc};

use crate::{domain::ConnectionId, infrastructure::dto::websocket::ServerEvent};

/// Frame queued for one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    /// Close the socket after the frames queued before it
    Close,
}

#[derive(Default)]
pub struct ConnectionHub {
    /// Message sender channel of each open connection
    clients: Mutex<HashMap<ConnectionId, mpsc::UnboundedSender<Outbound>>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::UnboundedSender<Outbound>,
    ) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
    }

    pub async fn unregister(&self, connection_id: &ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id).is_some()
    }

    pub async fn count(&self) -> usize {
        let clients = self.clients.lock().await;
        clients.len()
    }

    pub async fn send_to(&self, connection_id: &ConnectionId, event: &ServerEvent) {
        self.send_to_many(std::slice::from_ref(connection_id), event)
            .await;
    }

    /// Serialize once and queue the frame for every target
    pub async fn send_to_many(&self, targets: &[ConnectionId], event: &ServerEvent) {
        if targets.is_empty() {
            return;
        }
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize outbound event: {}", e);
                return;
            }
        };

        let clients = self.clients.lock().await;
        for target_id in targets {
            match clients.get(target_id) {
                Some(sender) => {
                    if sender.send(Outbound::Text(json.clone())).is_err() {
                        tracing::warn!("Failed to send message to connection '{}'", target_id);
                    }
                }
                None => tracing::debug!("Connection '{}' is gone, skipping", target_id),
            }
        }
    }

    /// Ask the writer task of `connection_id` to close the socket
    pub async fn close(&self, connection_id: &ConnectionId) {
        let clients = self.clients.lock().await;
        if let Some(sender) = clients.get(connection_id)
            && sender.send(Outbound::Close).is_err()
        {
            tracing::warn!("Failed to close connection '{}'", connection_id);
        }
    }
}
