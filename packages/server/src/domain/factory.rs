//! Domain factories for creating identifiers.

use super::{ConnectionId, MessageId, ParticipantId, PollId};

/// Factory for generating identifiers with random UUID v4 values.
///
/// This factory encapsulates the logic for generating new identifiers,
/// separating the generation concern from the validation logic in the
/// identifier value objects.
pub struct IdFactory;

impl IdFactory {
    pub fn participant_id() -> ParticipantId {
        ParticipantId::from_uuid(uuid::Uuid::new_v4())
    }

    pub fn connection_id() -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::new_v4())
    }

    pub fn poll_id() -> PollId {
        PollId::from_uuid(uuid::Uuid::new_v4())
    }

    pub fn message_id() -> MessageId {
        MessageId::from_uuid(uuid::Uuid::new_v4())
    }
}
