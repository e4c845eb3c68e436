//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod complete_poll;
pub mod create_poll;
pub mod error;
pub mod join_student;
pub mod query;
pub mod register_teacher;
pub mod remove_participant;
pub mod send_message;
pub mod submit_response;

pub use complete_poll::{CompletePollUseCase, CompletedPoll};
pub use create_poll::{CreatePollUseCase, CreatedPoll};
pub use error::{
    CreatePollError, JoinError, RemoveError, SendMessageError, SubmitResponseError,
};
pub use join_student::{JoinOutcome, JoinStudentUseCase};
pub use query::SessionQueryUseCase;
pub use register_teacher::RegisterTeacherUseCase;
pub use remove_participant::{DisconnectOutcome, RemoveParticipantUseCase};
pub use send_message::{SendMessageUseCase, SentMessage};
pub use submit_response::SubmitResponseUseCase;
