//! Live classroom polling server.
//!
//! One teacher and many students share a single session over WebSocket:
//! the teacher runs timed polls, students answer, everyone chats.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::run;
