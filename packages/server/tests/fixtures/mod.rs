//! Test fixtures shared by the integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use classpoll_server::ServerConfig;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{net::TcpListener, sync::oneshot};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// Server running in-process on an ephemeral port
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            classpoll_server::ui::serve(listener, &config, shutdown)
                .await
                .expect("Test server failed");
        });

        Self {
            addr,
            shutdown: Some(tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, query: &str) -> String {
        if query.is_empty() {
            format!("ws://{}/ws", self.addr)
        } else {
            format!("ws://{}/ws?{}", self.addr, query)
        }
    }

    pub async fn connect(&self, query: &str) -> WsClient {
        let (stream, _) = connect_async(self.ws_url(query))
            .await
            .expect("Failed to connect WebSocket");
        WsClient { stream }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// WebSocket client speaking the `{"event", "data"}` envelope
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl WsClient {
    pub async fn send(&mut self, frame: Value) {
        self.stream
            .send(Message::Text(frame.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next JSON frame, or `None` on close or after `timeout`
    pub async fn next_frame(&mut self, timeout: Duration) -> Option<Value> {
        loop {
            match tokio::time::timeout(timeout, self.stream.next()).await {
                Ok(Some(Ok(Message::Text(text)))) => {
                    return Some(serde_json::from_str(text.as_str()).expect("Invalid JSON frame"));
                }
                Ok(Some(Ok(Message::Close(_)))) | Ok(Some(Err(_))) | Ok(None) | Err(_) => {
                    return None;
                }
                Ok(Some(Ok(_))) => continue,
            }
        }
    }

    /// Skip frames until one with `event` arrives
    pub async fn expect_event(&mut self, event: &str) -> Value {
        loop {
            let frame = self
                .next_frame(Duration::from_secs(5))
                .await
                .unwrap_or_else(|| panic!("Connection ended before '{}'", event));
            if frame["event"] == event {
                return frame;
            }
        }
    }

    /// True once the server has closed the socket
    pub async fn is_closed(&mut self) -> bool {
        loop {
            match tokio::time::timeout(Duration::from_secs(5), self.stream.next()).await {
                Ok(Some(Ok(Message::Close(_)))) | Ok(None) | Ok(Some(Err(_))) => return true,
                Ok(Some(Ok(_))) => continue,
                Err(_) => return false,
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
