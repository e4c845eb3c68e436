//! UseCase: 投票の作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreatePollUseCase::execute() メソッド
//! - 教師の権限チェック、入力の検証、回答受付中の二重作成の拒否
//!
//! ### なぜこのテストが必要か
//! - 回答受付中の投票は常に 1 つだけであることを保証
//! - 不正な入力で投票が作られないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：教師による投票作成
//! - 異常系：教師以外による作成、選択肢不足、回答受付中の作成

use std::sync::Arc;

use classpoll_shared::time::get_unix_timestamp_millis;

use crate::domain::{ConnectionId, IdFactory, Poll, PollDraft, SessionRepository, Timestamp};

use super::error::CreatePollError;

/// 投票作成の結果
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPoll {
    pub poll: Poll,
    /// new-poll の配信先（生徒のみ）
    pub broadcast_targets: Vec<ConnectionId>,
}

/// 投票作成のユースケース
pub struct CreatePollUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    max_options: usize,
}

impl CreatePollUseCase {
    /// 新しい CreatePollUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>, max_options: usize) -> Self {
        Self {
            repository,
            max_options,
        }
    }

    /// 投票作成を実行
    ///
    /// # Arguments
    ///
    /// * `requester` - 要求元の接続（教師でなければならない）
    /// * `question` - 質問文
    /// * `options` - 選択肢（空白のみの要素は除外される）
    /// * `time_limit_secs` - 制限時間（秒）
    pub async fn execute(
        &self,
        requester: &ConnectionId,
        question: String,
        options: Vec<String>,
        time_limit_secs: u64,
    ) -> Result<CreatedPoll, CreatePollError> {
        // 1. 権限チェック
        let is_teacher = self
            .repository
            .get_teacher()
            .await
            .is_some_and(|t| &t.connection_id == requester);
        if !is_teacher {
            return Err(CreatePollError::NotTeacher);
        }

        // 2. 入力の検証
        let draft = PollDraft::new(question, options, time_limit_secs, self.max_options)?;

        // 3. 作成（回答受付中の投票があればドメインモデルが拒否する）
        let now = Timestamp::new(get_unix_timestamp_millis());
        // 配信先は作成と同じロックの中で確定する（後から参加した生徒は参加時に受け取る）
        let launch = self
            .repository
            .create_poll(IdFactory::poll_id(), draft, now)
            .await?;

        Ok(CreatedPoll {
            poll: launch.poll,
            broadcast_targets: launch.students,
        })
    }
}
