//! UseCase: 投票の完了処理（制限時間の経過）

use std::sync::Arc;

use classpoll_shared::time::get_unix_timestamp_millis;

use crate::domain::{Audience, ConnectionId, PollId, PollResult, SessionRepository, Timestamp};

/// 完了した投票と poll-completed の配信先
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedPoll {
    pub result: PollResult,
    pub broadcast_targets: Vec<ConnectionId>,
}

impl CompletedPoll {
    pub(crate) async fn with_targets(
        repository: &dyn SessionRepository,
        result: PollResult,
    ) -> Self {
        let broadcast_targets = repository.get_audience(Audience::Everyone).await;
        Self {
            result,
            broadcast_targets,
        }
    }
}

/// 投票完了のユースケース
pub struct CompletePollUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl CompletePollUseCase {
    /// 新しい CompletePollUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// `poll_id` がまだ回答受付中なら完了させる
    ///
    /// 既に完了済み（全員回答など）の場合は `None` を返します。
    pub async fn execute(&self, poll_id: &PollId) -> Option<CompletedPoll> {
        let now = Timestamp::new(get_unix_timestamp_millis());
        let result = self.repository.complete_poll(poll_id, now).await?;
        Some(CompletedPoll::with_targets(self.repository.as_ref(), result).await)
    }
}
