//! WebSocket message DTOs for the polling protocol.
//!
//! Every frame is a JSON envelope `{"event": "<name>", "data": <payload>}`.
//! `data` may be omitted for events that carry no payload.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ChatMessage, Participant, Poll, PollResult};

/// Raw inbound envelope
#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinStudentPayload {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JoinTeacherPayload {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollPayload {
    pub question: String,
    pub options: Vec<String>,
    pub time_limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponsePayload {
    pub selected_option: String,
}

/// Kick target, sent either as a bare id string or as `{"studentId": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KickTarget {
    Id(String),
    Object {
        #[serde(rename = "studentId")]
        student_id: String,
    },
}

impl KickTarget {
    pub fn into_id(self) -> String {
        match self {
            KickTarget::Id(id) | KickTarget::Object { student_id: id } => id,
        }
    }
}

/// Chat payload; any `sender` field sent by clients is ignored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendMessagePayload {
    pub text: String,
}

/// Inbound events from clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    JoinStudent(JoinStudentPayload),
    JoinTeacher(JoinTeacherPayload),
    GetParticipantsList,
    CreatePoll(CreatePollPayload),
    SubmitResponse(SubmitResponsePayload),
    KickStudent(KickTarget),
    SendMessage(SendMessagePayload),
    GetMessages,
    GetPollHistory,
}

#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("Malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Unknown event '{0}'")]
    UnknownEvent(String),

    #[error("Invalid payload for '{event}': {source}")]
    InvalidPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientEvent {
    /// Decode a text frame into a typed event
    pub fn parse(text: &str) -> Result<Self, EventParseError> {
        let Envelope { event, data } =
            serde_json::from_str(text).map_err(EventParseError::Malformed)?;

        let decoded = match event.as_str() {
            "join-student" => payload(data).map(ClientEvent::JoinStudent),
            "join-teacher" => payload(data).map(ClientEvent::JoinTeacher),
            "get-participants-list" => Ok(ClientEvent::GetParticipantsList),
            "create-poll" => payload(data).map(ClientEvent::CreatePoll),
            "submit-response" => payload(data).map(ClientEvent::SubmitResponse),
            "kick-student" => payload(data).map(ClientEvent::KickStudent),
            "send-message" => payload(data).map(ClientEvent::SendMessage),
            "get-messages" => Ok(ClientEvent::GetMessages),
            "get-poll-history" => Ok(ClientEvent::GetPollHistory),
            _ => return Err(EventParseError::UnknownEvent(event)),
        };
        decoded.map_err(|source| EventParseError::InvalidPayload { event, source })
    }

    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinStudent(_) => "join-student",
            ClientEvent::JoinTeacher(_) => "join-teacher",
            ClientEvent::GetParticipantsList => "get-participants-list",
            ClientEvent::CreatePoll(_) => "create-poll",
            ClientEvent::SubmitResponse(_) => "submit-response",
            ClientEvent::KickStudent(_) => "kick-student",
            ClientEvent::SendMessage(_) => "send-message",
            ClientEvent::GetMessages => "get-messages",
            ClientEvent::GetPollHistory => "get-poll-history",
        }
    }
}

/// Missing or `null` data decodes as an empty object
fn payload<T: DeserializeOwned>(data: Value) -> Result<T, serde_json::Error> {
    let data = match data {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(data)
}

/// Participant entry of `participants-list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub id: String,
    pub name: String,
}

impl From<&Participant> for ParticipantDto {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.as_str().to_string(),
            name: participant.name.as_str().to_string(),
        }
    }
}

/// Payload of `new-poll`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollDto {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Seconds left to answer
    pub time_limit: u64,
}

impl PollDto {
    /// Announce `poll` with `remaining_secs` left on its countdown
    pub fn with_remaining(poll: &Poll, remaining_secs: u64) -> Self {
        Self {
            id: poll.id.as_str().to_string(),
            question: poll.question.as_str().to_string(),
            options: poll
                .options
                .iter()
                .map(|o| o.as_str().to_string())
                .collect(),
            time_limit: remaining_secs,
        }
    }
}

impl From<&Poll> for PollDto {
    fn from(poll: &Poll) -> Self {
        Self::with_remaining(poll, poll.time_limit.as_secs())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionResultDto {
    pub option: String,
    pub votes: usize,
    pub percentage: u32,
    pub voters: Vec<String>,
}

/// Payload of `poll-completed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResultDto {
    pub poll_id: String,
    pub question: String,
    pub total_participants: usize,
    pub total_responses: usize,
    pub options: Vec<OptionResultDto>,
    /// Unix timestamp (milliseconds since epoch)
    pub completed_at: i64,
}

impl From<&PollResult> for PollResultDto {
    fn from(result: &PollResult) -> Self {
        Self {
            poll_id: result.poll_id.as_str().to_string(),
            question: result.question.as_str().to_string(),
            total_participants: result.total_participants,
            total_responses: result.total_responses,
            options: result
                .options
                .iter()
                .map(|tally| OptionResultDto {
                    option: tally.label.as_str().to_string(),
                    votes: tally.votes,
                    percentage: tally.percentage,
                    voters: tally
                        .voters
                        .iter()
                        .map(|v| v.as_str().to_string())
                        .collect(),
                })
                .collect(),
            completed_at: result.completed_at.value(),
        }
    }
}

/// Payload of `new-message` and entries of `chat-history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    pub sender: String,
    pub text: String,
    /// Unix timestamp (milliseconds since epoch)
    pub timestamp: i64,
    pub is_teacher: bool,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            sender: message.sender_name.as_str().to_string(),
            text: message.content.as_str().to_string(),
            timestamp: message.timestamp.value(),
            is_teacher: message.sender_is_teacher,
        }
    }
}

/// Rejection category reported to the originating connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Bad or missing fields
    Validation,
    /// Operation not allowed in the current poll/roster state
    ProtocolState,
    /// Connection never registered
    UnknownParticipant,
    /// Teacher-only operation from another connection
    Forbidden,
    Capacity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub kind: ErrorKind,
    pub message: String,
}

/// Outbound events pushed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    NewPoll(PollDto),
    PollCompleted(PollResultDto),
    ParticipantsList(Vec<ParticipantDto>),
    NewMessage(ChatMessageDto),
    ChatHistory(Vec<ChatMessageDto>),
    PollHistory(Vec<PollResultDto>),
    Kicked,
    Error(ErrorDto),
}
