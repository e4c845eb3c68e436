//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! 単一の `ClassroomSession` を 1 つの Mutex で保護します。
//!
//! 各メソッドはロックを 1 回だけ取得し、その中でドメインモデルの操作を
//! 完結させます。これにより投票の作成・回答・タイマー完了が途中で
//! 交差することはありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Admission, Audience, ChatMessage, ClassroomSession, ConnectionId, Participant, ParticipantId,
    Poll, PollDraft, PollError, PollId, PollLaunch, PollResult, Removal, RosterError,
    SessionRepository, Teacher, Timestamp,
};

/// インメモリ Session Repository 実装
///
/// プロセスの生存期間だけ状態を保持します。
pub struct InMemorySessionRepository {
    /// ClassroomSession ドメインモデル
    session: Arc<Mutex<ClassroomSession>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(session: Arc<Mutex<ClassroomSession>>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn get_session(&self) -> ClassroomSession {
        let session = self.session.lock().await;
        session.clone()
    }

    async fn add_participant(&self, participant: Participant) -> Result<Admission, RosterError> {
        let mut session = self.session.lock().await;
        session.add_participant(participant)
    }

    async fn remove_participant(
        &self,
        participant_id: &ParticipantId,
        now: Timestamp,
    ) -> Result<Removal, RosterError> {
        let mut session = self.session.lock().await;
        session.remove_participant(participant_id, now)
    }

    async fn find_participant_by_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Option<Participant> {
        let session = self.session.lock().await;
        session.roster().find_by_connection(connection_id).cloned()
    }

    async fn get_participants(&self) -> Vec<Participant> {
        let session = self.session.lock().await;
        session.roster().participants().to_vec()
    }

    async fn claim_teacher(&self, teacher: Teacher) -> Result<(), RosterError> {
        let mut session = self.session.lock().await;
        session.claim_teacher(teacher)
    }

    async fn release_teacher(&self, connection_id: &ConnectionId) -> bool {
        let mut session = self.session.lock().await;
        session.release_teacher(connection_id)
    }

    async fn get_teacher(&self) -> Option<Teacher> {
        let session = self.session.lock().await;
        session.roster().teacher().cloned()
    }

    async fn create_poll(
        &self,
        poll_id: PollId,
        draft: PollDraft,
        now: Timestamp,
    ) -> Result<PollLaunch, PollError> {
        let mut session = self.session.lock().await;
        session.create_poll(poll_id, draft, now)
    }

    async fn submit_response(
        &self,
        participant_id: &ParticipantId,
        option: &str,
        now: Timestamp,
    ) -> Result<Option<PollResult>, PollError> {
        let mut session = self.session.lock().await;
        session.submit_response(participant_id, option, now)
    }

    async fn complete_poll(&self, poll_id: &PollId, now: Timestamp) -> Option<PollResult> {
        let mut session = self.session.lock().await;
        session.complete_poll(poll_id, now)
    }

    async fn get_active_poll(&self) -> Option<Poll> {
        let session = self.session.lock().await;
        session.polls().active_poll().cloned()
    }

    async fn get_poll_history(&self) -> Vec<PollResult> {
        let session = self.session.lock().await;
        session.polls().history().to_vec()
    }

    async fn add_message(&self, message: ChatMessage) {
        let mut session = self.session.lock().await;
        session.add_message(message);
    }

    async fn get_messages(&self) -> Vec<ChatMessage> {
        let session = self.session.lock().await;
        session.chat().messages().to_vec()
    }

    async fn get_audience(&self, audience: Audience) -> Vec<ConnectionId> {
        let session = self.session.lock().await;
        session.audience(audience)
    }
}
