//! Roster of the classroom session: the teacher slot and the student list.

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::RosterError,
    value_object::{ConnectionId, ParticipantId, ParticipantName, Timestamp},
};

/// Default maximum number of students allowed in a session
pub const DEFAULT_PARTICIPANT_CAPACITY: usize = 100;

/// Display name used when the teacher does not provide one
pub const DEFAULT_TEACHER_NAME: &str = "Teacher";

/// Represents a student in the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant identifier, generated on join
    pub id: ParticipantId,
    pub name: ParticipantName,
    /// Delivery handle; never outlives the connection
    pub connection_id: ConnectionId,
    /// Timestamp when the participant joined
    pub joined_at: Timestamp,
}

impl Participant {
    /// Create a new participant
    pub fn new(
        id: ParticipantId,
        name: ParticipantName,
        connection_id: ConnectionId,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            connection_id,
            joined_at,
        }
    }
}

/// The single teacher of the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub connection_id: ConnectionId,
    pub name: ParticipantName,
}

/// Ordered list of students plus the teacher slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    /// Students in join order
    participants: Vec<Participant>,
    teacher: Option<Teacher>,
    /// Maximum number of students allowed
    capacity: usize,
}

impl Default for Roster {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_PARTICIPANT_CAPACITY)
    }
}

impl Roster {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            participants: Vec::new(),
            teacher: None,
            capacity,
        }
    }

    /// Add a student to the roster
    ///
    /// # Errors
    ///
    /// - `RosterError::DuplicateConnection` if the connection is already registered
    /// - `RosterError::CapacityExceeded` if the roster is at full capacity
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), RosterError> {
        if self.is_registered(&participant.connection_id) {
            return Err(RosterError::DuplicateConnection(participant.connection_id));
        }
        if self.participants.len() >= self.capacity {
            return Err(RosterError::CapacityExceeded {
                capacity: self.capacity,
                current: self.participants.len(),
            });
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Remove a student by ID, returning the removed entry
    pub fn remove_participant(
        &mut self,
        participant_id: &ParticipantId,
    ) -> Result<Participant, RosterError> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.id == participant_id)
            .ok_or_else(|| RosterError::UnknownParticipant(participant_id.clone()))?;
        Ok(self.participants.remove(index))
    }

    pub fn get_participant(&self, participant_id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == participant_id)
    }

    pub fn find_by_connection(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| &p.connection_id == connection_id)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Claim the teacher slot for a connection
    ///
    /// Re-claiming from the connection that already holds the slot only
    /// updates the display name.
    pub fn claim_teacher(&mut self, teacher: Teacher) -> Result<(), RosterError> {
        if self.find_by_connection(&teacher.connection_id).is_some() {
            return Err(RosterError::DuplicateConnection(teacher.connection_id));
        }
        match &self.teacher {
            Some(current) if current.connection_id != teacher.connection_id => {
                Err(RosterError::TeacherAlreadyPresent)
            }
            _ => {
                self.teacher = Some(teacher);
                Ok(())
            }
        }
    }

    /// Free the teacher slot if `connection_id` holds it
    pub fn release_teacher(&mut self, connection_id: &ConnectionId) -> bool {
        if self.is_teacher(connection_id) {
            self.teacher = None;
            return true;
        }
        false
    }

    pub fn teacher(&self) -> Option<&Teacher> {
        self.teacher.as_ref()
    }

    pub fn is_teacher(&self, connection_id: &ConnectionId) -> bool {
        self.teacher
            .as_ref()
            .is_some_and(|t| &t.connection_id == connection_id)
    }

    fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.is_teacher(connection_id) || self.find_by_connection(connection_id).is_some()
    }
}
