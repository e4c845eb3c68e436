//! Repository trait for the classroom session.
//!
//! Implementations must apply each method atomically against the single
//! session: the poll's collecting/completed transition relies on it, and
//! the snapshots returned by mutations must reflect exactly that mutation.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{
    entity::{ChatMessage, Participant, Poll, PollDraft, PollResult, Teacher},
    error::{PollError, RosterError},
    session::{Admission, Audience, ClassroomSession, PollLaunch, Removal},
    value_object::{ConnectionId, ParticipantId, PollId, Timestamp},
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Snapshot of the whole session (debug and HTTP views)
    async fn get_session(&self) -> ClassroomSession;

    /// Add a student and report the roster and active poll it joined into
    async fn add_participant(&self, participant: Participant) -> Result<Admission, RosterError>;

    async fn remove_participant(
        &self,
        participant_id: &ParticipantId,
        now: Timestamp,
    ) -> Result<Removal, RosterError>;

    async fn find_participant_by_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Option<Participant>;

    /// Students in join order
    async fn get_participants(&self) -> Vec<Participant>;

    async fn claim_teacher(&self, teacher: Teacher) -> Result<(), RosterError>;

    async fn release_teacher(&self, connection_id: &ConnectionId) -> bool;

    async fn get_teacher(&self) -> Option<Teacher>;

    async fn create_poll(
        &self,
        poll_id: PollId,
        draft: PollDraft,
        now: Timestamp,
    ) -> Result<PollLaunch, PollError>;

    async fn submit_response(
        &self,
        participant_id: &ParticipantId,
        option: &str,
        now: Timestamp,
    ) -> Result<Option<PollResult>, PollError>;

    /// Complete `poll_id` if it is still collecting
    async fn complete_poll(&self, poll_id: &PollId, now: Timestamp) -> Option<PollResult>;

    async fn get_active_poll(&self) -> Option<Poll>;

    async fn get_poll_history(&self) -> Vec<PollResult>;

    async fn add_message(&self, message: ChatMessage);

    async fn get_messages(&self) -> Vec<ChatMessage>;

    async fn get_audience(&self, audience: Audience) -> Vec<ConnectionId>;
}
