//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者の解決（生徒・教師）、本文の検証、履歴への追加
//!
//! ### なぜこのテストが必要か
//! - 送信者自身を含む全員にメッセージが届くことを保証
//! - 参加していない接続からのメッセージが履歴に残らないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：生徒・教師からのメッセージ送信
//! - 異常系：空白のみの本文、未参加の接続

use std::sync::Arc;

use classpoll_shared::time::get_unix_timestamp_millis;

use crate::domain::{
    Audience, ChatMessage, ConnectionId, IdFactory, MessageContent, SessionRepository, Timestamp,
};

use super::error::SendMessageError;

/// メッセージ送信の結果
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub message: ChatMessage,
    /// new-message の配信先（送信者を含む全員）
    pub broadcast_targets: Vec<ConnectionId>,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信元の接続
    /// * `text` - 本文（検証前の文字列）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        text: String,
    ) -> Result<SentMessage, SendMessageError> {
        // 1. 本文の検証
        let content = MessageContent::new(text)?;

        // 2. 送信者の解決（教師 → 生徒の順）
        let (sender_name, is_teacher) = match self.repository.get_teacher().await {
            Some(teacher) if &teacher.connection_id == connection_id => (teacher.name, true),
            _ => {
                let participant = self
                    .repository
                    .find_participant_by_connection(connection_id)
                    .await
                    .ok_or_else(|| SendMessageError::UnknownSender(connection_id.clone()))?;
                (participant.name, false)
            }
        };

        // 3. 履歴に追加
        let message = ChatMessage::new(
            IdFactory::message_id(),
            sender_name,
            is_teacher,
            content,
            Timestamp::new(get_unix_timestamp_millis()),
        );
        self.repository.add_message(message.clone()).await;

        let broadcast_targets = self.repository.get_audience(Audience::Everyone).await;

        Ok(SentMessage {
            message,
            broadcast_targets,
        })
    }
}
