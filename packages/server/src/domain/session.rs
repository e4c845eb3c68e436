//! The classroom session aggregate.
//!
//! One `ClassroomSession` exists per process. It owns the roster, the poll
//! engine and the chat log, and is the only place where rules that cross
//! those parts are enforced (a response must come from a rostered student,
//! a removal may finish the active poll).

use serde::{Deserialize, Serialize};

use super::{
    entity::{
        ChatLog, ChatMessage, Participant, Poll, PollDraft, PollEngine, PollResult,
        ResponsePolicy, Roster, Teacher,
    },
    error::{PollError, RosterError},
    value_object::{ConnectionId, ParticipantId, PollId, Timestamp},
};

/// Who an outbound event is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every student and the teacher
    Everyone,
    Students,
    Teacher,
}

/// Students and the connections of everyone, taken in one read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSnapshot {
    /// Students in join order
    pub participants: Vec<Participant>,
    /// Every student and the teacher
    pub audience: Vec<ConnectionId>,
}

/// Outcome of admitting a student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// Roster right after the join
    pub roster: RosterSnapshot,
    /// Poll collecting at the moment of the join
    pub active_poll: Option<Poll>,
}

/// Outcome of removing a student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub participant: Participant,
    /// Set when the removal left every remaining student with a response
    pub completed: Option<PollResult>,
    /// Roster right after the removal
    pub roster: RosterSnapshot,
}

/// A freshly created poll and the students it goes out to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollLaunch {
    pub poll: Poll,
    /// Students on the roster when the poll was created
    pub students: Vec<ConnectionId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassroomSession {
    /// Timestamp when the session was created
    pub created_at: Timestamp,
    roster: Roster,
    polls: PollEngine,
    chat: ChatLog,
}

impl ClassroomSession {
    pub fn new(created_at: Timestamp, participant_capacity: usize, policy: ResponsePolicy) -> Self {
        Self {
            created_at,
            roster: Roster::with_capacity(participant_capacity),
            polls: PollEngine::new(policy),
            chat: ChatLog::default(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn polls(&self) -> &PollEngine {
        &self.polls
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn add_participant(&mut self, participant: Participant) -> Result<Admission, RosterError> {
        self.roster.add_participant(participant)?;
        Ok(Admission {
            roster: self.roster_snapshot(),
            active_poll: self.polls.active_poll().cloned(),
        })
    }

    /// Remove a student. Responses already recorded stay counted.
    pub fn remove_participant(
        &mut self,
        participant_id: &ParticipantId,
        now: Timestamp,
    ) -> Result<Removal, RosterError> {
        let participant = self.roster.remove_participant(participant_id)?;
        let completed = self
            .polls
            .complete_if_everyone_responded(self.roster.participants(), now);
        Ok(Removal {
            participant,
            completed,
            roster: self.roster_snapshot(),
        })
    }

    pub fn claim_teacher(&mut self, teacher: Teacher) -> Result<(), RosterError> {
        self.roster.claim_teacher(teacher)
    }

    pub fn release_teacher(&mut self, connection_id: &ConnectionId) -> bool {
        self.roster.release_teacher(connection_id)
    }

    pub fn create_poll(
        &mut self,
        id: PollId,
        draft: PollDraft,
        now: Timestamp,
    ) -> Result<PollLaunch, PollError> {
        let poll = self.polls.create_poll(id, draft, now)?.clone();
        Ok(PollLaunch {
            poll,
            students: self.audience(Audience::Students),
        })
    }

    /// Record a student's answer; returns the result if this completed the poll
    pub fn submit_response(
        &mut self,
        participant_id: &ParticipantId,
        option: &str,
        now: Timestamp,
    ) -> Result<Option<PollResult>, PollError> {
        let participant = self
            .roster
            .get_participant(participant_id)
            .ok_or_else(|| PollError::UnknownParticipant(participant_id.clone()))?;
        self.polls
            .submit_response(participant, option, self.roster.participants(), now)
    }

    pub fn complete_poll(&mut self, poll_id: &PollId, now: Timestamp) -> Option<PollResult> {
        self.polls
            .complete_poll(poll_id, self.roster.participants(), now)
    }

    pub fn add_message(&mut self, message: ChatMessage) {
        self.chat.append(message);
    }

    pub fn roster_snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            participants: self.roster.participants().to_vec(),
            audience: self.audience(Audience::Everyone),
        }
    }

    /// Connections that should receive an event for `audience`
    pub fn audience(&self, audience: Audience) -> Vec<ConnectionId> {
        let students = self
            .roster
            .participants()
            .iter()
            .map(|p| p.connection_id.clone());
        let teacher = self.roster.teacher().map(|t| t.connection_id.clone());
        match audience {
            Audience::Everyone => students.chain(teacher).collect(),
            Audience::Students => students.collect(),
            Audience::Teacher => teacher.into_iter().collect(),
        }
    }
}
