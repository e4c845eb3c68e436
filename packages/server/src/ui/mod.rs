//! WebSocket and HTTP front end of the polling server.

pub mod gateway;
mod handler;
mod runner;
mod signal;
pub mod state;
mod timer;

pub use runner::{build_router, run, serve};
