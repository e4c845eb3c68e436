//! Classpoll live classroom polling server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin classpoll-server -- --port 8080
//! ```

use clap::Parser;

use classpoll_server::ServerConfig;
use classpoll_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = classpoll_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
