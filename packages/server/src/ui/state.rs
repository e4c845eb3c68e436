//! Server state shared by the handlers.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;

use classpoll_shared::time::get_unix_timestamp_millis;

use crate::{
    config::ServerConfig,
    domain::{ClassroomSession, SessionRepository, Timestamp},
    infrastructure::{connection::ConnectionHub, repository::InMemorySessionRepository},
    ui::gateway::{ConnectRole, Gateway},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    /// `teacher` or `student`
    pub role: Option<String>,
    pub name: Option<String>,
}

impl ConnectQuery {
    /// Role to apply once the socket is open
    ///
    /// A student role needs a name; without one the client joins later with
    /// `join-student`.
    pub fn role(self) -> Result<Option<ConnectRole>, String> {
        match self.role.as_deref() {
            Some("teacher") => Ok(Some(ConnectRole::Teacher { name: self.name })),
            Some("student") => Ok(self.name.map(|name| ConnectRole::Student { name })),
            None => Ok(None),
            Some(other) => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn SessionRepository>,
    /// Owns the connection hub used for broadcasting
    pub gateway: Gateway,
}

impl AppState {
    /// Build a fresh session for `config`
    pub fn new(config: &ServerConfig) -> Self {
        let session = Arc::new(Mutex::new(ClassroomSession::new(
            Timestamp::new(get_unix_timestamp_millis()),
            config.max_participants,
            config.response_policy(),
        )));
        let repository: Arc<dyn SessionRepository> =
            Arc::new(InMemorySessionRepository::new(session));
        let gateway = Gateway::new(
            repository.clone(),
            Arc::new(ConnectionHub::new()),
            config.max_options,
        );

        Self {
            repository,
            gateway,
        }
    }
}
