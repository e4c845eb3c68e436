//! UseCase: 読み取り専用の問い合わせ（参加者一覧・チャット履歴・投票履歴）

use std::sync::Arc;

use crate::domain::{ChatMessage, Participant, PollResult, SessionRepository};

/// セッション状態を参照するユースケース
pub struct SessionQueryUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl SessionQueryUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 生徒一覧（参加順）
    pub async fn participants(&self) -> Vec<Participant> {
        self.repository.get_participants().await
    }

    /// チャット履歴（到着順）
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.repository.get_messages().await
    }

    /// 完了した投票の結果（完了順）
    pub async fn poll_history(&self) -> Vec<PollResult> {
        self.repository.get_poll_history().await
    }
}
