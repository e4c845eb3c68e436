//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use classpoll_shared::time::timestamp_to_rfc3339;

use crate::{
    infrastructure::dto::{
        http::{ActivePollDto, ParticipantDetailDto, SessionSummaryDto},
        websocket::PollResultDto,
    },
    ui::state::AppState,
    usecase::SessionQueryUseCase,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current session state
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionSummaryDto> {
    let session = state.repository.get_session().await;

    let participants = session
        .roster()
        .participants()
        .iter()
        .map(|p| ParticipantDetailDto {
            id: p.id.as_str().to_string(),
            name: p.name.as_str().to_string(),
            joined_at: timestamp_to_rfc3339(p.joined_at.value()),
        })
        .collect();

    let active_poll = session.polls().active_poll().map(|poll| ActivePollDto {
        id: poll.id.as_str().to_string(),
        question: poll.question.as_str().to_string(),
        options: poll
            .options
            .iter()
            .map(|o| o.as_str().to_string())
            .collect(),
        time_limit: poll.time_limit.as_secs(),
        responses: poll.responses().len(),
        created_at: timestamp_to_rfc3339(poll.created_at.value()),
    });

    Json(SessionSummaryDto {
        participants,
        teacher_present: session.roster().teacher().is_some(),
        active_poll,
        completed_polls: session.polls().history().len(),
        messages: session.chat().messages().len(),
        created_at: timestamp_to_rfc3339(session.created_at.value()),
    })
}

/// Completed poll results in completion order
pub async fn get_polls(State(state): State<Arc<AppState>>) -> Json<Vec<PollResultDto>> {
    let history = SessionQueryUseCase::new(state.repository.clone())
        .poll_history()
        .await;
    Json(history.iter().map(PollResultDto::from).collect())
}
