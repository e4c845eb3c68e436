//! UseCase 層のエラー定義
//!
//! 各エラーは `kind()` でクライアントへ返す分類（ErrorKind）に変換されます。

use thiserror::Error;

use crate::{
    domain::{ConnectionId, PollError, RosterError, ValueObjectError},
    infrastructure::dto::websocket::ErrorKind,
};

/// 参加（生徒・教師）のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    #[error(transparent)]
    InvalidName(#[from] ValueObjectError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

impl JoinError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JoinError::InvalidName(_) => ErrorKind::Validation,
            JoinError::Roster(e) => roster_kind(e),
        }
    }
}

/// 参加者削除（切断・キック）のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoveError {
    #[error("Only the teacher can remove students")]
    NotTeacher,

    #[error(transparent)]
    InvalidParticipantId(#[from] ValueObjectError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

impl RemoveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RemoveError::NotTeacher => ErrorKind::Forbidden,
            RemoveError::InvalidParticipantId(_) => ErrorKind::Validation,
            RemoveError::Roster(e) => roster_kind(e),
        }
    }
}

/// 投票作成のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreatePollError {
    #[error("Only the teacher can create polls")]
    NotTeacher,

    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    #[error(transparent)]
    Poll(#[from] PollError),
}

impl CreatePollError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CreatePollError::NotTeacher => ErrorKind::Forbidden,
            CreatePollError::Validation(_) => ErrorKind::Validation,
            CreatePollError::Poll(e) => poll_kind(e),
        }
    }
}

/// 回答送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitResponseError {
    #[error("Connection '{0}' has not joined as a student")]
    UnknownConnection(ConnectionId),

    #[error(transparent)]
    Poll(#[from] PollError),
}

impl SubmitResponseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmitResponseError::UnknownConnection(_) => ErrorKind::UnknownParticipant,
            SubmitResponseError::Poll(e) => poll_kind(e),
        }
    }
}

/// メッセージ送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    #[error("Connection '{0}' has not joined the session")]
    UnknownSender(ConnectionId),
}

impl SendMessageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SendMessageError::Validation(_) => ErrorKind::Validation,
            SendMessageError::UnknownSender(_) => ErrorKind::UnknownParticipant,
        }
    }
}

fn roster_kind(error: &RosterError) -> ErrorKind {
    match error {
        RosterError::UnknownParticipant(_) => ErrorKind::UnknownParticipant,
        RosterError::CapacityExceeded { .. } => ErrorKind::Capacity,
        RosterError::DuplicateConnection(_) | RosterError::TeacherAlreadyPresent => {
            ErrorKind::ProtocolState
        }
    }
}

fn poll_kind(error: &PollError) -> ErrorKind {
    match error {
        PollError::UnknownParticipant(_) => ErrorKind::UnknownParticipant,
        PollError::PollInProgress
        | PollError::NotCollecting
        | PollError::InvalidOption(_)
        | PollError::AlreadyResponded(_) => ErrorKind::ProtocolState,
    }
}
