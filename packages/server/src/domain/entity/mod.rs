//! Core domain models for the classroom session.

pub mod chat;
pub mod poll;
pub mod roster;

pub use chat::{ChatLog, ChatMessage};
pub use poll::{
    DEFAULT_MAX_OPTION_COUNT, OptionTally, Poll, PollDraft, PollEngine, PollResult,
    Response, ResponsePolicy,
};
pub use roster::{DEFAULT_PARTICIPANT_CAPACITY, DEFAULT_TEACHER_NAME, Participant, Roster, Teacher};
