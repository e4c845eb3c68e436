//! UseCase: 回答の送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitResponseUseCase::execute() メソッド
//! - 回答の記録、全員回答時の即時完了、不正な選択肢の拒否
//!
//! ### なぜこのテストが必要か
//! - 全員が回答した時点で結果が 1 度だけ作られることを保証
//! - 未参加の接続や受付終了後の回答が集計に混ざらないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：回答の記録、最後の回答による完了
//! - 異常系：存在しない選択肢、未参加の接続、投票なし
//! - エッジケース：回答の上書き

use std::sync::Arc;

use classpoll_shared::time::get_unix_timestamp_millis;

use crate::domain::{ConnectionId, SessionRepository, Timestamp};

use super::{complete_poll::CompletedPoll, error::SubmitResponseError};

/// 回答送信のユースケース
pub struct SubmitResponseUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl SubmitResponseUseCase {
    /// 新しい SubmitResponseUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 回答送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(CompletedPoll))` - この回答で全員が回答済みになった
    /// * `Ok(None)` - 回答を記録した
    /// * `Err(SubmitResponseError)` - 回答を受け付けなかった
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        option: &str,
    ) -> Result<Option<CompletedPoll>, SubmitResponseError> {
        let participant = self
            .repository
            .find_participant_by_connection(connection_id)
            .await
            .ok_or_else(|| SubmitResponseError::UnknownConnection(connection_id.clone()))?;

        let now = Timestamp::new(get_unix_timestamp_millis());
        let completed = self
            .repository
            .submit_response(&participant.id, option, now)
            .await?;

        match completed {
            Some(result) => Ok(Some(
                CompletedPoll::with_targets(self.repository.as_ref(), result).await,
            )),
            None => Ok(None),
        }
    }
}
