//! UseCase: 参加者の削除処理（切断・キック）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RemoveParticipantUseCase::disconnect() / kick() メソッド
//! - 切断時の名簿からの削除、教師枠の解放、キックの権限チェック
//!
//! ### なぜこのテストが必要か
//! - 切断した接続が名簿に残り続けないことを保証
//! - 教師以外がキックできないことを保証
//! - 削除によって投票が完了するケース（残り全員が回答済み）を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：生徒の切断、教師の切断、教師によるキック
//! - 異常系：教師以外のキック、存在しない生徒のキック
//! - エッジケース：未登録の接続の切断

use std::sync::Arc;

use classpoll_shared::time::get_unix_timestamp_millis;

use crate::domain::{ConnectionId, ParticipantId, Removal, SessionRepository, Timestamp};

use super::error::RemoveError;

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq)]
pub enum DisconnectOutcome {
    /// 削除後の名簿（participants-list / poll-completed の配信先を含む）付き
    Student(Removal),
    Teacher,
    /// 参加前に切断した接続
    Unregistered,
}

/// 参加者削除のユースケース
pub struct RemoveParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl RemoveParticipantUseCase {
    /// 新しい RemoveParticipantUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 接続の切断に伴う削除を実行
    pub async fn disconnect(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<DisconnectOutcome, RemoveError> {
        if self.repository.release_teacher(connection_id).await {
            return Ok(DisconnectOutcome::Teacher);
        }

        let Some(participant) = self
            .repository
            .find_participant_by_connection(connection_id)
            .await
        else {
            return Ok(DisconnectOutcome::Unregistered);
        };

        self.remove(&participant.id)
            .await
            .map(DisconnectOutcome::Student)
    }

    /// 教師によるキックを実行
    ///
    /// # Arguments
    ///
    /// * `requester` - 要求元の接続（教師でなければならない）
    /// * `student_id` - 削除対象の参加者 ID（検証前の文字列）
    pub async fn kick(
        &self,
        requester: &ConnectionId,
        student_id: String,
    ) -> Result<Removal, RemoveError> {
        // 1. 権限チェック
        let is_teacher = self
            .repository
            .get_teacher()
            .await
            .is_some_and(|t| &t.connection_id == requester);
        if !is_teacher {
            return Err(RemoveError::NotTeacher);
        }

        // 2. 削除
        let participant_id = ParticipantId::new(student_id)?;
        self.remove(&participant_id).await
    }

    async fn remove(&self, participant_id: &ParticipantId) -> Result<Removal, RemoveError> {
        let now = Timestamp::new(get_unix_timestamp_millis());
        let removal = self
            .repository
            .remove_participant(participant_id, now)
            .await?;
        Ok(removal)
    }
}
