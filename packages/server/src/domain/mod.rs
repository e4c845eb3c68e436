//! Domain layer for the classroom polling server.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{
    ChatLog, ChatMessage, OptionTally, Participant, Poll, PollDraft, PollEngine, PollResult,
    ResponsePolicy, Roster, Teacher,
};
pub use error::{PollError, RosterError, ValueObjectError};
pub use factory::IdFactory;
pub use repository::SessionRepository;
pub use session::{
    Admission, Audience, ClassroomSession, PollLaunch, Removal, RosterSnapshot,
};
pub use value_object::{
    ConnectionId, MessageContent, MessageId, OptionLabel, ParticipantId, ParticipantName, PollId,
    Question, TimeLimit, Timestamp,
};
