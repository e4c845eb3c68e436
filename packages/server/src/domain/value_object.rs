//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a participant display name (characters)
pub const MAX_PARTICIPANT_NAME_LENGTH: usize = 50;

/// Maximum length of a poll question (characters)
pub const MAX_QUESTION_LENGTH: usize = 100;

/// Maximum length of a single option label (characters)
pub const MAX_OPTION_LABEL_LENGTH: usize = 200;

/// Maximum length of a chat message (characters)
pub const MAX_MESSAGE_LENGTH: usize = 10000;

/// Shortest allowed poll countdown (seconds)
pub const MIN_TIME_LIMIT_SECS: u64 = 5;

/// Longest allowed poll countdown (seconds)
pub const MAX_TIME_LIMIT_SECS: u64 = 600;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, requiring UUID format.
            pub fn new(id: String) -> Result<Self, ValueObjectError> {
                if id.is_empty() {
                    return Err(ValueObjectError::IdEmpty { kind: $kind });
                }
                Uuid::parse_str(&id).map_err(|_| ValueObjectError::IdInvalidFormat {
                    kind: $kind,
                    value: id.clone(),
                })?;
                Ok(Self(id))
            }

            /// Wrap an already generated UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid.to_string())
            }

            /// Get the inner string value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Session-scoped identifier of a student participant.
    ParticipantId,
    "ParticipantId"
);

uuid_identifier!(
    /// Identifier of one WebSocket connection. Lives only as long as the socket.
    ConnectionId,
    "ConnectionId"
);

uuid_identifier!(
    /// Identifier of a poll.
    PollId,
    "PollId"
);

uuid_identifier!(
    /// Server-assigned identifier of a chat message, used by clients to dedup.
    MessageId,
    "MessageId"
);

/// Trim `value` and check it is non-empty and at most `max` characters.
fn bounded_text(
    value: String,
    max: usize,
    empty: ValueObjectError,
    too_long: impl FnOnce(usize) -> ValueObjectError,
) -> Result<String, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(too_long(len));
    }
    Ok(trimmed.to_string())
}

/// Display name of a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantName(String);

impl ParticipantName {
    /// Create a new ParticipantName. Surrounding whitespace is removed.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        bounded_text(
            name,
            MAX_PARTICIPANT_NAME_LENGTH,
            ValueObjectError::ParticipantNameEmpty,
            |actual| ValueObjectError::ParticipantNameTooLong {
                max: MAX_PARTICIPANT_NAME_LENGTH,
                actual,
            },
        )
        .map(Self)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Question text of a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question(String);

impl Question {
    pub fn new(question: String) -> Result<Self, ValueObjectError> {
        bounded_text(
            question,
            MAX_QUESTION_LENGTH,
            ValueObjectError::QuestionEmpty,
            |actual| ValueObjectError::QuestionTooLong {
                max: MAX_QUESTION_LENGTH,
                actual,
            },
        )
        .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Label of one answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLabel(String);

impl OptionLabel {
    pub fn new(label: String) -> Result<Self, ValueObjectError> {
        bounded_text(
            label,
            MAX_OPTION_LABEL_LENGTH,
            ValueObjectError::OptionLabelEmpty,
            |actual| ValueObjectError::OptionLabelTooLong {
                max: MAX_OPTION_LABEL_LENGTH,
                actual,
            },
        )
        .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a submitted answer names this option.
    ///
    /// Comparison ignores surrounding whitespace of the submission.
    pub fn matches(&self, submitted: &str) -> bool {
        self.0 == submitted.trim()
    }
}

/// Countdown length of a poll, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLimit(u64);

impl TimeLimit {
    pub fn from_secs(secs: u64) -> Result<Self, ValueObjectError> {
        if !(MIN_TIME_LIMIT_SECS..=MAX_TIME_LIMIT_SECS).contains(&secs) {
            return Err(ValueObjectError::TimeLimitOutOfRange {
                min: MIN_TIME_LIMIT_SECS,
                max: MAX_TIME_LIMIT_SECS,
                actual: secs,
            });
        }
        Ok(Self(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.0)
    }
}

/// Message content value object.
///
/// Represents the content of a chat message with validation.
/// Whitespace-only content is rejected; the text itself is kept as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// # Arguments
    ///
    /// * `content` - The message content string
    ///
    /// # Returns
    ///
    /// A Result containing the MessageContent or an error if validation fails
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        if content.trim().is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        let len = content.chars().count();
        if len > MAX_MESSAGE_LENGTH {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MAX_MESSAGE_LENGTH,
                actual: len,
            });
        }
        Ok(Self(content))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    ///
    /// # Arguments
    ///
    /// * `value` - Unix timestamp in milliseconds
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, clamped at zero.
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        u64::try_from(self.0 - earlier.0).unwrap_or(0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_new_success() {
        // テスト項目: UUID 形式の参加者 ID を作成できる
        // given (前提条件):
        let id = "550e8400-e29b-41d4-a716-446655440000".to_string();

        // when (操作):
        let result = ParticipantId::new(id);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            result.unwrap().as_str(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_participant_id_invalid_format_fails() {
        // テスト項目: UUID 形式でない参加者 ID は作成できない
        // given (前提条件):
        let id = "alice".to_string();

        // when (操作):
        let result = ParticipantId::new(id);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::IdInvalidFormat {
                kind: "ParticipantId",
                value: "alice".to_string()
            }
        );
    }

    #[test]
    fn test_connection_id_empty_fails() {
        // テスト項目: 空の接続 ID は作成できない
        // when (操作):
        let result = ConnectionId::new(String::new());

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::IdEmpty {
                kind: "ConnectionId"
            }
        );
    }

    #[test]
    fn test_participant_name_is_trimmed() {
        // テスト項目: 参加者名の前後の空白は取り除かれる
        // when (操作):
        let name = ParticipantName::new("  Anjali Sharma \n".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "Anjali Sharma");
    }

    #[test]
    fn test_participant_name_whitespace_only_fails() {
        // テスト項目: 空白のみの参加者名は作成できない
        // when (操作):
        let result = ParticipantName::new("   ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::ParticipantNameEmpty);
    }

    #[test]
    fn test_participant_name_too_long_fails() {
        // テスト項目: 51 文字以上の参加者名は作成できない
        // when (操作):
        let result = ParticipantName::new("a".repeat(51));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::ParticipantNameTooLong {
                max: 50,
                actual: 51
            }
        );
    }

    #[test]
    fn test_question_empty_fails() {
        // テスト項目: 空の質問文は作成できない
        // when (操作):
        let result = Question::new(" ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::QuestionEmpty);
    }

    #[test]
    fn test_question_length_limit() {
        // テスト項目: 質問文は 100 文字まで
        // then (期待する結果):
        assert!(Question::new("a".repeat(100)).is_ok());
        assert_eq!(
            Question::new("a".repeat(101)).unwrap_err(),
            ValueObjectError::QuestionTooLong {
                max: 100,
                actual: 101
            }
        );
    }

    #[test]
    fn test_option_label_matches_ignores_padding() {
        // テスト項目: 回答の前後の空白は選択肢の照合に影響しない
        // given (前提条件):
        let label = OptionLabel::new("Paris".to_string()).unwrap();

        // then (期待する結果):
        assert!(label.matches(" Paris "));
        assert!(!label.matches("paris"));
        assert!(!label.matches("London"));
    }

    #[test]
    fn test_time_limit_bounds() {
        // テスト項目: 制限時間は 5 秒以上 600 秒以下でなければならない
        // then (期待する結果):
        assert!(TimeLimit::from_secs(5).is_ok());
        assert!(TimeLimit::from_secs(600).is_ok());
        assert_eq!(
            TimeLimit::from_secs(4).unwrap_err(),
            ValueObjectError::TimeLimitOutOfRange {
                min: 5,
                max: 600,
                actual: 4
            }
        );
        assert!(TimeLimit::from_secs(601).is_err());
    }

    #[test]
    fn test_message_content_new_success() {
        // テスト項目: 有効なメッセージ内容を作成できる
        // given (前提条件):
        let content = "Hello, world!".to_string();

        // when (操作):
        let result = MessageContent::new(content);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "Hello, world!");
    }

    #[test]
    fn test_message_content_whitespace_only_fails() {
        // テスト項目: 空白のみのメッセージ内容は作成できない
        // when (操作):
        let result = MessageContent::new(" \t\n".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::MessageContentEmpty);
    }

    #[test]
    fn test_message_content_new_too_long_fails() {
        // テスト項目: 10001 文字以上のメッセージ内容は作成できない
        // given (前提条件):
        let content = "a".repeat(10001);

        // when (操作):
        let result = MessageContent::new(content);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::MessageContentTooLong {
                max: 10000,
                actual: 10001
            }
        );
    }

    #[test]
    fn test_timestamp_millis_since_clamps() {
        // テスト項目: 経過時間は負にならない
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2500);

        // then (期待する結果):
        assert_eq!(ts2.millis_since(ts1), 1500);
        assert_eq!(ts1.millis_since(ts2), 0);
        assert!(ts1 < ts2);
    }
}
