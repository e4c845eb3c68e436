//! Infrastructure layer: storage, connection delivery and wire formats.

pub mod connection;
pub mod dto;
pub mod repository;
