//! Chat log of the session.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::{MessageContent, MessageId, ParticipantName, Timestamp};

/// Represents a chat message in the domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server-assigned identifier
    pub id: MessageId,
    /// Sender's display name
    pub sender_name: ParticipantName,
    pub sender_is_teacher: bool,
    /// Message content
    pub content: MessageContent,
    /// Timestamp when the message was received
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(
        id: MessageId,
        sender_name: ParticipantName,
        sender_is_teacher: bool,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            sender_name,
            sender_is_teacher,
            content,
            timestamp,
        }
    }
}

/// Append-only message history in arrival order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
