//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::{ConnectionId, ParticipantId};

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Identifier validation error
    #[error("{kind} cannot be empty")]
    IdEmpty { kind: &'static str },

    /// Identifier invalid format error (not a valid UUID format)
    #[error("{kind} must be a valid UUID format (got: {value})")]
    IdInvalidFormat { kind: &'static str, value: String },

    #[error("Participant name cannot be empty")]
    ParticipantNameEmpty,

    #[error("Participant name cannot exceed {max} characters (got {actual})")]
    ParticipantNameTooLong { max: usize, actual: usize },

    #[error("Question cannot be empty")]
    QuestionEmpty,

    #[error("Question cannot exceed {max} characters (got {actual})")]
    QuestionTooLong { max: usize, actual: usize },

    #[error("Option label cannot be empty")]
    OptionLabelEmpty,

    #[error("Option label cannot exceed {max} characters (got {actual})")]
    OptionLabelTooLong { max: usize, actual: usize },

    /// Fewer than two usable options after dropping blank labels
    #[error("A poll needs at least {min} non-empty options (got {actual})")]
    TooFewOptions { min: usize, actual: usize },

    #[error("A poll cannot have more than {max} options (got {actual})")]
    TooManyOptions { max: usize, actual: usize },

    #[error("Time limit must be between {min} and {max} seconds (got {actual})")]
    TimeLimitOutOfRange { min: u64, max: u64, actual: u64 },

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors related to the roster (who is in the session)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// The connection already holds a registration (student or teacher)
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("Unknown participant '{0}'")]
    UnknownParticipant(ParticipantId),

    /// Roster capacity exceeded error
    #[error("Session capacity exceeded: maximum {capacity} participants allowed (current: {current})")]
    CapacityExceeded { capacity: usize, current: usize },

    #[error("Another connection is already registered as the teacher")]
    TeacherAlreadyPresent,
}

/// Errors related to the poll lifecycle
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("A poll is already collecting responses")]
    PollInProgress,

    #[error("No poll is collecting responses")]
    NotCollecting,

    #[error("Unknown participant '{0}'")]
    UnknownParticipant(ParticipantId),

    #[error("'{0}' is not an option of the current poll")]
    InvalidOption(String),

    /// Raised only when vote changes are disabled
    #[error("Participant '{0}' has already responded to the current poll")]
    AlreadyResponded(ParticipantId),
}
