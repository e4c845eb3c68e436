//! Router construction and server lifecycle.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    ui::{
        handler::{get_polls, get_session, health_check, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Build the router over `state`
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/session", get(get_session))
        .route("/api/polls", get(get_polls))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    config: &ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Run the server until Ctrl-C or SIGTERM
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        "Listening on {} (max {} students, max {} options, vote change {})",
        listener.local_addr()?,
        config.max_participants,
        config.max_options,
        if config.allow_vote_change {
            "allowed"
        } else {
            "disabled"
        }
    );

    serve(listener, &config, shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}
