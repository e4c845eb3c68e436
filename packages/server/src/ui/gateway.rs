//! Event dispatcher between WebSocket connections and the use cases.
//!
//! The gateway owns no session state. It decodes a frame, runs the matching
//! use case with the caller's connection id, and fans the outcome out through
//! the connection hub. Use case errors are reported to the caller only.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ConnectionId, Participant, PollId, Removal, SessionRepository},
    infrastructure::{
        connection::{ConnectionHub, Outbound},
        dto::websocket::{
            ChatMessageDto, ClientEvent, CreatePollPayload, ErrorDto, ErrorKind,
            JoinStudentPayload, JoinTeacherPayload, ParticipantDto, PollDto, PollResultDto,
            ServerEvent,
        },
    },
    ui::timer::PollTimer,
    usecase::{
        CompletePollUseCase, CompletedPoll, CreatePollUseCase, DisconnectOutcome,
        JoinStudentUseCase, RegisterTeacherUseCase, RemoveParticipantUseCase,
        SendMessageUseCase, SessionQueryUseCase, SubmitResponseUseCase,
    },
};

/// Role requested on the connect URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectRole {
    Teacher { name: Option<String> },
    Student { name: String },
}

#[derive(Clone)]
pub struct Gateway {
    repository: Arc<dyn SessionRepository>,
    hub: Arc<ConnectionHub>,
    timer: Arc<PollTimer>,
    /// Held from a roster change until its participants-list is queued,
    /// so lists reach every connection in the order the changes committed
    roster_order: Arc<Mutex<()>>,
    max_options: usize,
}

impl Gateway {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        hub: Arc<ConnectionHub>,
        max_options: usize,
    ) -> Self {
        Self {
            repository,
            hub,
            timer: Arc::new(PollTimer::new()),
            roster_order: Arc::new(Mutex::new(())),
            max_options,
        }
    }

    /// Register a new connection and apply the role from the connect URL
    pub async fn connect(
        &self,
        connection_id: &ConnectionId,
        sender: mpsc::UnboundedSender<Outbound>,
        role: Option<ConnectRole>,
    ) {
        self.hub.register(connection_id.clone(), sender).await;
        tracing::info!(
            "Connection '{}' opened ({} live)",
            connection_id,
            self.hub.count().await
        );

        let event = match role {
            Some(ConnectRole::Teacher { name }) => {
                ClientEvent::JoinTeacher(JoinTeacherPayload { name })
            }
            Some(ConnectRole::Student { name }) => {
                ClientEvent::JoinStudent(JoinStudentPayload { name })
            }
            None => return,
        };
        self.dispatch(connection_id, event).await;
    }

    /// Remove whatever the closing connection held in the session
    pub async fn disconnect(&self, connection_id: &ConnectionId) {
        self.hub.unregister(connection_id).await;

        let _roster = self.roster_order.lock().await;
        let usecase = RemoveParticipantUseCase::new(self.repository.clone());
        match usecase.disconnect(connection_id).await {
            Ok(DisconnectOutcome::Student(removal)) => {
                tracing::info!("Student '{}' left the session", removal.participant.name);
                self.after_removal(removal).await;
            }
            Ok(DisconnectOutcome::Teacher) => {
                tracing::info!("Teacher on '{}' left the session", connection_id);
            }
            Ok(DisconnectOutcome::Unregistered) => {
                tracing::debug!("Connection '{}' closed without joining", connection_id);
            }
            Err(e) => {
                // a kicked student is already gone from the roster
                tracing::debug!("Nothing to remove for '{}': {}", connection_id, e);
            }
        }
    }

    /// Decode one text frame and dispatch it
    pub async fn handle_frame(&self, connection_id: &ConnectionId, text: &str) {
        match ClientEvent::parse(text) {
            Ok(event) => self.dispatch(connection_id, event).await,
            Err(e) => {
                self.reply_error(connection_id, ErrorKind::Validation, e.to_string())
                    .await
            }
        }
    }

    pub async fn dispatch(&self, connection_id: &ConnectionId, event: ClientEvent) {
        tracing::debug!("'{}' -> {}", connection_id, event.name());

        match event {
            ClientEvent::JoinStudent(payload) => self.join_student(connection_id, payload).await,
            ClientEvent::JoinTeacher(payload) => self.join_teacher(connection_id, payload).await,
            ClientEvent::GetParticipantsList => {
                let _roster = self.roster_order.lock().await;
                let participants = SessionQueryUseCase::new(self.repository.clone())
                    .participants()
                    .await;
                self.hub
                    .send_to(connection_id, &participants_list(&participants))
                    .await;
            }
            ClientEvent::CreatePoll(payload) => self.create_poll(connection_id, payload).await,
            ClientEvent::SubmitResponse(payload) => {
                let usecase = SubmitResponseUseCase::new(self.repository.clone());
                match usecase
                    .execute(connection_id, &payload.selected_option)
                    .await
                {
                    Ok(Some(completed)) => self.finish_poll(completed).await,
                    Ok(None) => {}
                    Err(e) => self.reply_error(connection_id, e.kind(), e.to_string()).await,
                }
            }
            ClientEvent::KickStudent(target) => {
                let _roster = self.roster_order.lock().await;
                let usecase = RemoveParticipantUseCase::new(self.repository.clone());
                match usecase.kick(connection_id, target.into_id()).await {
                    Ok(removal) => {
                        let kicked = removal.participant.connection_id.clone();
                        tracing::info!("Student '{}' was kicked", removal.participant.name);
                        self.hub.send_to(&kicked, &ServerEvent::Kicked).await;
                        self.hub.close(&kicked).await;
                        self.after_removal(removal).await;
                    }
                    Err(e) => self.reply_error(connection_id, e.kind(), e.to_string()).await,
                }
            }
            ClientEvent::SendMessage(payload) => {
                let usecase = SendMessageUseCase::new(self.repository.clone());
                match usecase.execute(connection_id, payload.text).await {
                    Ok(sent) => {
                        let event = ServerEvent::NewMessage(ChatMessageDto::from(&sent.message));
                        self.hub.send_to_many(&sent.broadcast_targets, &event).await;
                    }
                    Err(e) => self.reply_error(connection_id, e.kind(), e.to_string()).await,
                }
            }
            ClientEvent::GetMessages => {
                let messages = SessionQueryUseCase::new(self.repository.clone())
                    .messages()
                    .await;
                let event = ServerEvent::ChatHistory(messages.iter().map(Into::into).collect());
                self.hub.send_to(connection_id, &event).await;
            }
            ClientEvent::GetPollHistory => {
                let history = SessionQueryUseCase::new(self.repository.clone())
                    .poll_history()
                    .await;
                let event = ServerEvent::PollHistory(history.iter().map(Into::into).collect());
                self.hub.send_to(connection_id, &event).await;
            }
        }
    }

    async fn join_student(&self, connection_id: &ConnectionId, payload: JoinStudentPayload) {
        let _roster = self.roster_order.lock().await;
        let usecase = JoinStudentUseCase::new(self.repository.clone());
        match usecase.execute(connection_id.clone(), payload.name).await {
            Ok(outcome) => {
                tracing::info!(
                    "Student '{}' joined as '{}'",
                    outcome.participant.name,
                    outcome.participant.id
                );
                self.hub
                    .send_to_many(
                        &outcome.broadcast_targets,
                        &participants_list(&outcome.participants),
                    )
                    .await;
                if let Some((poll, remaining)) = outcome.active_poll {
                    let event = ServerEvent::NewPoll(PollDto::with_remaining(&poll, remaining));
                    self.hub.send_to(connection_id, &event).await;
                }
            }
            Err(e) => self.reply_error(connection_id, e.kind(), e.to_string()).await,
        }
    }

    async fn join_teacher(&self, connection_id: &ConnectionId, payload: JoinTeacherPayload) {
        let _roster = self.roster_order.lock().await;
        let usecase = RegisterTeacherUseCase::new(self.repository.clone());
        match usecase.execute(connection_id.clone(), payload.name).await {
            Ok(teacher) => {
                tracing::info!("Teacher '{}' joined on '{}'", teacher.name, connection_id);
                let participants = SessionQueryUseCase::new(self.repository.clone())
                    .participants()
                    .await;
                self.hub
                    .send_to(connection_id, &participants_list(&participants))
                    .await;
            }
            Err(e) => self.reply_error(connection_id, e.kind(), e.to_string()).await,
        }
    }

    async fn create_poll(&self, connection_id: &ConnectionId, payload: CreatePollPayload) {
        let usecase = CreatePollUseCase::new(self.repository.clone(), self.max_options);
        let created = match usecase
            .execute(
                connection_id,
                payload.question,
                payload.options,
                payload.time_limit,
            )
            .await
        {
            Ok(created) => created,
            Err(e) => return self.reply_error(connection_id, e.kind(), e.to_string()).await,
        };

        let poll = created.poll;
        tracing::info!(
            "Poll '{}' started ({} options, {}s)",
            poll.id,
            poll.options.len(),
            poll.time_limit.as_secs()
        );
        self.arm_countdown(poll.id.clone(), poll.time_limit.as_duration())
            .await;
        self.hub
            .send_to_many(
                &created.broadcast_targets,
                &ServerEvent::NewPoll(PollDto::from(&poll)),
            )
            .await;
    }

    async fn arm_countdown(&self, poll_id: PollId, duration: std::time::Duration) {
        let gateway = self.clone();
        let armed = poll_id.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            gateway.timer.clear(&armed).await;
            let usecase = CompletePollUseCase::new(gateway.repository.clone());
            match usecase.execute(&armed).await {
                Some(completed) => {
                    tracing::info!("Poll '{}' timed out", armed);
                    gateway.publish_result(&completed).await;
                }
                None => tracing::debug!("Poll '{}' had already completed", armed),
            }
        });
        self.timer.arm(poll_id, task.abort_handle()).await;
    }

    /// Broadcast a result produced before the countdown ran out
    async fn finish_poll(&self, completed: CompletedPoll) {
        self.timer.cancel(&completed.result.poll_id).await;
        tracing::info!(
            "Poll '{}' completed with {}/{} responses",
            completed.result.poll_id,
            completed.result.total_responses,
            completed.result.total_participants
        );
        self.publish_result(&completed).await;
    }

    async fn publish_result(&self, completed: &CompletedPoll) {
        let event = ServerEvent::PollCompleted(PollResultDto::from(&completed.result));
        self.hub
            .send_to_many(&completed.broadcast_targets, &event)
            .await;
    }

    async fn after_removal(&self, removal: Removal) {
        let roster = removal.roster;
        self.hub
            .send_to_many(&roster.audience, &participants_list(&roster.participants))
            .await;
        if let Some(result) = removal.completed {
            self.finish_poll(CompletedPoll {
                result,
                broadcast_targets: roster.audience,
            })
            .await;
        }
    }

    async fn reply_error(&self, connection_id: &ConnectionId, kind: ErrorKind, message: String) {
        tracing::warn!("Rejected request from '{}': {}", connection_id, message);
        let event = ServerEvent::Error(ErrorDto { kind, message });
        self.hub.send_to(connection_id, &event).await;
    }
}

fn participants_list(participants: &[Participant]) -> ServerEvent {
    ServerEvent::ParticipantsList(participants.iter().map(ParticipantDto::from).collect())
}
