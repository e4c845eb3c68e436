//! UseCase: 生徒の参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinStudentUseCase::execute() メソッド
//! - 生徒の参加処理（名前の検証、重複接続チェック、参加者リスト構築）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：同じ接続からの二重参加を防ぐ
//! - 回答受付中に参加した生徒へ残り時間付きで投票が届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規生徒の参加
//! - 異常系：重複した接続での参加、空の名前、容量超過
//! - エッジケース：投票の途中参加

use std::sync::Arc;

use classpoll_shared::time::get_unix_timestamp_millis;

use crate::domain::{
    ConnectionId, IdFactory, Participant, ParticipantName, Poll, SessionRepository, Timestamp,
};

use super::error::JoinError;

/// 参加結果
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub participant: Participant,
    /// 参加後の生徒一覧（参加順）
    pub participants: Vec<Participant>,
    /// participants-list の配信先
    pub broadcast_targets: Vec<ConnectionId>,
    /// 回答受付中の投票と残り秒数
    pub active_poll: Option<(Poll, u64)>,
}

/// 生徒参加のユースケース
pub struct JoinStudentUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl JoinStudentUseCase {
    /// 新しい JoinStudentUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 生徒の参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続の ID
    /// * `name` - 表示名（検証前の文字列）
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 参加成功
    /// * `Err(JoinError)` - 参加失敗
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        name: String,
    ) -> Result<JoinOutcome, JoinError> {
        // 1. 名前の検証
        let name = ParticipantName::new(name)?;

        // 2. Repository に参加者を追加（重複・容量チェックはドメインモデルが行う）
        let now = Timestamp::new(get_unix_timestamp_millis());
        let participant = Participant::new(IdFactory::participant_id(), name, connection_id, now);
        // 名簿・配信先・投票は追加と同じロックの中で取得される
        let admission = self.repository.add_participant(participant.clone()).await?;

        // 3. 配信内容の構築
        let active_poll = admission.active_poll.map(|poll| {
            let remaining = poll.remaining_secs(now);
            (poll, remaining)
        });

        Ok(JoinOutcome {
            participant,
            participants: admission.roster.participants,
            broadcast_targets: admission.roster.audience,
            active_poll,
        })
    }
}
