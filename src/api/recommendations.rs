use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::clients::models::common::ExerciseId;
use crate::services::form::{SelectionToken, SetForm};
use crate::services::goals::{GoalConfig, TrainingGoal};
use crate::services::progressive_overload::RecommendationRequest;

#[derive(Debug, Serialize)]
pub struct GoalInfo {
    pub goal: TrainingGoal,
    pub name: &'static str,
    pub config: Option<GoalConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GoalSetting {
    pub goal: TrainingGoal,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub exercise_id: ExerciseId,
    pub goal: Option<TrainingGoal>,
}

#[derive(Debug, Deserialize)]
pub struct FormUpdate {
    pub weight_text: Option<String>,
    pub reps: Option<u32>,
}

pub async fn list_goals() -> Json<Vec<GoalInfo>> {
    Json(
        TrainingGoal::all()
            .iter()
            .map(|goal| GoalInfo {
                goal: *goal,
                name: goal.display_name(),
                config: goal.config().copied(),
            })
            .collect(),
    )
}

pub async fn get_goal(State(state): State<AppState>) -> Json<GoalSetting> {
    Json(GoalSetting { goal: state.goal() })
}

pub async fn update_goal(
    State(state): State<AppState>,
    Json(setting): Json<GoalSetting>,
) -> Json<GoalSetting> {
    state.set_goal(setting.goal);
    tracing::info!(goal = %setting.goal, "settings.goal_updated");
    Json(setting)
}

pub async fn get_form(State(state): State<AppState>) -> Json<SetForm> {
    Json(state.form().clone())
}

pub async fn update_form(
    State(state): State<AppState>,
    Json(update): Json<FormUpdate>,
) -> Json<SetForm> {
    let mut form = state.form();
    if let Some(weight_text) = update.weight_text {
        form.weight_text = weight_text;
    }
    if update.reps.is_some() {
        form.reps = update.reps;
    }
    Json(form.clone())
}

pub async fn select_exercise(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Json<SetForm> {
    let token = state.selection.begin();
    let goal = request.goal.unwrap_or_else(|| state.goal());

    {
        let mut form = state.form();
        if form.exercise_id != Some(request.exercise_id) {
            form.exercise_id = Some(request.exercise_id);
            form.suggestion = None;
            form.source = None;
        }
        form.goal = Some(goal);
    }

    tracing::debug!(exercise_id = request.exercise_id, goal = %goal, "selection.changed");
    refresh_suggestion(&state, token, request.exercise_id, goal).await;

    Json(state.form().clone())
}

/// Recomputes the suggestion for `exercise_id` and writes it to the form, unless the
/// selection moved on while the workout log was being queried. Returns whether the form
/// was updated.
pub async fn refresh_suggestion(
    state: &AppState,
    token: SelectionToken,
    exercise_id: ExerciseId,
    goal: TrainingGoal,
) -> bool {
    let typed_weight = Some(state.form().weight_text.clone()).filter(|text| !text.is_empty());
    let request = RecommendationRequest {
        exercise_id,
        goal,
        typed_weight,
    };

    let Some(recommendation) = state.progressive_overload_service.recommend(&request).await
    else {
        return false;
    };

    let mut form = state.form();
    if !state.selection.is_current(token) || form.exercise_id != Some(exercise_id) {
        tracing::debug!(exercise_id, "selection.stale_result_dropped");
        return false;
    }
    form.apply(&recommendation);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use crate::config::Config;
    use crate::test_utils::InMemoryWorkoutLog;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SQUAT: ExerciseId = 5;

    fn state_with(log: &Arc<InMemoryWorkoutLog>) -> AppState {
        AppState::new(Config::for_tests(), log.clone())
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_selection_fills_the_form() {
        let log = Arc::new(InMemoryWorkoutLog::new());
        log.log_set(1, SQUAT, 100.0, 10, Some(8.0));
        let state = state_with(&log);
        state.progressive_overload_service.sync_session(Some(2));

        let (status, body) = send(&state, "PUT", "/selection", r#"{"exercise_id": 5}"#).await;
        assert_eq!(status, StatusCode::OK);

        let form: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(form["exercise_id"], 5);
        assert_eq!(form["goal"], "hypertrophy");
        assert_eq!(form["weight_text"], "102.5");
        assert_eq!(form["reps"], 9);
        assert_eq!(form["source"], "first_set");
    }

    #[tokio::test]
    async fn test_no_recommendation_leaves_typed_values() {
        let log = Arc::new(InMemoryWorkoutLog::new());
        log.log_set(1, SQUAT, 100.0, 10, Some(8.0));
        let state = state_with(&log);

        send(&state, "PUT", "/form", r#"{"weight_text": "77", "reps": 4}"#).await;
        let (_, body) = send(
            &state,
            "PUT",
            "/selection",
            r#"{"exercise_id": 5, "goal": "no_recommendation"}"#,
        )
        .await;

        let form: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(form["weight_text"], "77");
        assert_eq!(form["reps"], 4);
        assert_eq!(log.calls(), 0);
    }

    #[tokio::test]
    async fn test_typed_weight_seeds_a_new_exercise() {
        let log = Arc::new(InMemoryWorkoutLog::new());
        let state = state_with(&log);

        send(&state, "PUT", "/form", r#"{"weight_text": "51 kg"}"#).await;
        send(&state, "PUT", "/selection", r#"{"exercise_id": 5}"#).await;

        let form = state.form().clone();
        assert_eq!(form.weight_text, "50");
        assert_eq!(form.reps, Some(8));
    }

    #[tokio::test]
    async fn test_stale_result_is_dropped() {
        let log = Arc::new(InMemoryWorkoutLog::new());
        let state = state_with(&log);
        state.form().exercise_id = Some(SQUAT);

        let stale = state.selection.begin();
        state.selection.begin();

        let written = refresh_suggestion(&state, stale, SQUAT, TrainingGoal::Strength).await;
        assert!(!written);
        assert_eq!(state.form().reps, None);
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_the_form() {
        let log = Arc::new(InMemoryWorkoutLog::new());
        let state = state_with(&log);
        send(&state, "PUT", "/form", r#"{"weight_text": "60", "reps": 6}"#).await;
        log.fail_requests(true);

        let (status, body) = send(&state, "PUT", "/selection", r#"{"exercise_id": 5}"#).await;
        assert_eq!(status, StatusCode::OK);

        let form: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(form["weight_text"], "60");
        assert_eq!(form["reps"], 6);
    }

    #[tokio::test]
    async fn test_goal_setting_round_trip() {
        let log = Arc::new(InMemoryWorkoutLog::new());
        let state = state_with(&log);

        let (_, body) = send(&state, "GET", "/settings/goal", "").await;
        assert_eq!(body, r#"{"goal":"hypertrophy"}"#);

        let (status, _) = send(&state, "PUT", "/settings/goal", r#"{"goal": "strength"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.goal(), TrainingGoal::Strength);

        let (status, _) = send(&state, "PUT", "/settings/goal", r#"{"goal": "cardio"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_list_goals() {
        let log = Arc::new(InMemoryWorkoutLog::new());
        let state = state_with(&log);

        let (_, body) = send(&state, "GET", "/goals", "").await;
        let goals: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(goals.as_array().unwrap().len(), 4);
        assert_eq!(goals[1]["goal"], "hypertrophy");
        assert_eq!(goals[1]["config"]["reps_low"], 6);
        assert!(goals[3]["config"].is_null());
    }
}
