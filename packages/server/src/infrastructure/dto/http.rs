//! HTTP API response DTOs for the polling server.

use serde::{Deserialize, Serialize};

/// Session summary for the session endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummaryDto {
    pub participants: Vec<ParticipantDetailDto>,
    pub teacher_present: bool,
    pub active_poll: Option<ActivePollDto>,
    pub completed_polls: usize,
    pub messages: usize,
    pub created_at: String, // ISO 8601
}

/// Participant detail for the session endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub id: String,
    pub name: String,
    pub joined_at: String, // ISO 8601
}

/// The poll currently collecting responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivePollDto {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub time_limit: u64,
    pub responses: usize,
    pub created_at: String, // ISO 8601
}
