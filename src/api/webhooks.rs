use axum::Json;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
};
use serde::Deserialize;
use std::result::Result;

use crate::api::AppState;
use crate::api::recommendations::refresh_suggestion;
use crate::clients::models::common::{ExerciseId, SessionId};

/// Notifications pushed by the workout log when session state changes.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WebhookEvent {
    SessionStarted {
        session_id: SessionId,
    },
    SessionEnded {
        session_id: SessionId,
    },
    SetLogged {
        session_id: SessionId,
        exercise_id: ExerciseId,
    },
}

fn authenticate_request(headers: &HeaderMap, state: &AppState) -> Result<(), StatusCode> {
    let auth_header = match headers.get(AUTHORIZATION) {
        Some(header) => header,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(_) => return Err(StatusCode::UNAUTHORIZED),
    };

    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    if token != state.config.webhook_token {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(())
}

pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<WebhookEvent>,
) -> impl IntoResponse {
    if let Err(response) = authenticate_request(&headers, &state) {
        return response.into_response();
    }

    tracing::info!(?event, "webhook.received");
    handle_event(&state, event);

    StatusCode::OK.into_response()
}

pub fn handle_event(state: &AppState, event: WebhookEvent) {
    let service = &state.progressive_overload_service;

    match event {
        WebhookEvent::SessionStarted { session_id } => {
            service.sync_session(Some(session_id));
        }
        WebhookEvent::SessionEnded { session_id } => {
            if service.active_session() == Some(session_id) {
                service.sync_session(None);
            } else {
                tracing::debug!(session_id, "webhook.session_ended_not_active");
            }
        }
        WebhookEvent::SetLogged {
            session_id,
            exercise_id,
        } => {
            // A set can only be logged into the open session.
            service.sync_session(Some(session_id));

            let selected_goal = {
                let form = state.form();
                if form.exercise_id != Some(exercise_id) {
                    return;
                }
                form.goal
            };

            let token = state.selection.begin();
            let goal = selected_goal.unwrap_or_else(|| state.goal());
            let state = state.clone();

            // Recompute off the request path; the selection token guards the write.
            tokio::spawn(async move {
                refresh_suggestion(&state, token, exercise_id, goal).await;
            });
        }
    }
}
