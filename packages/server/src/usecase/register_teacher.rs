//! UseCase: 教師の登録処理
//!
//! 教師枠はセッションに 1 つだけ存在します。
//! 教師は参加者一覧（participants-list）には含まれません。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ParticipantName, SessionRepository, Teacher, entity::DEFAULT_TEACHER_NAME,
};

use super::error::JoinError;

/// 教師登録のユースケース
pub struct RegisterTeacherUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl RegisterTeacherUseCase {
    /// 新しい RegisterTeacherUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 教師枠の取得を実行
    ///
    /// 名前が省略された場合は "Teacher" を使います。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        name: Option<String>,
    ) -> Result<Teacher, JoinError> {
        let name = ParticipantName::new(name.unwrap_or_else(|| DEFAULT_TEACHER_NAME.to_string()))?;
        let teacher = Teacher {
            connection_id,
            name,
        };
        self.repository.claim_teacher(teacher.clone()).await?;
        Ok(teacher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdFactory, RosterError, repository::MockSessionRepository};

    #[tokio::test]
    async fn test_register_teacher_default_name() {
        // テスト項目: 名前を省略すると既定の名前で登録される
        // given (前提条件):
        let mut repository = MockSessionRepository::new();
        repository
            .expect_claim_teacher()
            .withf(|teacher| teacher.name.as_str() == "Teacher")
            .times(1)
            .returning(|_| Ok(()));
        let usecase = RegisterTeacherUseCase::new(Arc::new(repository));

        // when (操作):
        let result = usecase.execute(IdFactory::connection_id(), None).await;

        // then (期待する結果):
        assert_eq!(result.unwrap().name.as_str(), "Teacher");
    }

    #[tokio::test]
    async fn test_register_teacher_already_present() {
        // テスト項目: 既に教師がいる場合はエラーが返される
        // given (前提条件):
        let mut repository = MockSessionRepository::new();
        repository
            .expect_claim_teacher()
            .returning(|_| Err(RosterError::TeacherAlreadyPresent));
        let usecase = RegisterTeacherUseCase::new(Arc::new(repository));

        // when (操作):
        let result = usecase
            .execute(IdFactory::connection_id(), Some("Ms. Rao".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            JoinError::Roster(RosterError::TeacherAlreadyPresent)
        );
    }

    #[tokio::test]
    async fn test_register_teacher_blank_name_rejected() {
        // テスト項目: 空白のみの名前は Repository に到達する前に拒否される
        // given (前提条件):
        let mut repository = MockSessionRepository::new();
        repository.expect_claim_teacher().never();
        let usecase = RegisterTeacherUseCase::new(Arc::new(repository));

        // when (操作):
        let result = usecase
            .execute(IdFactory::connection_id(), Some(" ".to_string()))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(JoinError::InvalidName(_))));
    }
}
