use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;

use crate::clients::workout_log::WorkoutLog;
use crate::config::Config;
use crate::services::form::{SelectionTracker, SetForm};
use crate::services::goals::TrainingGoal;
use crate::services::progressive_overload::ProgressiveOverloadService;

pub mod recommendations;
pub mod webhooks;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub workout_log: Arc<dyn WorkoutLog>,
    pub progressive_overload_service: ProgressiveOverloadService,
    pub selection: SelectionTracker,
    form: Arc<Mutex<SetForm>>,
    goal: Arc<Mutex<TrainingGoal>>,
}

impl AppState {
    pub fn new(config: Config, workout_log: Arc<dyn WorkoutLog>) -> Self {
        let goal = config.default_goal;
        Self {
            config,
            progressive_overload_service: ProgressiveOverloadService::new(workout_log.clone()),
            workout_log,
            selection: SelectionTracker::new(),
            form: Arc::new(Mutex::new(SetForm::default())),
            goal: Arc::new(Mutex::new(goal)),
        }
    }

    pub fn form(&self) -> MutexGuard<'_, SetForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn goal(&self) -> TrainingGoal {
        *self.goal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_goal(&self, goal: TrainingGoal) {
        *self.goal.lock().unwrap_or_else(PoisonError::into_inner) = goal;
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "set-overload is running" }))
        .route("/goals", get(recommendations::list_goals))
        .route(
            "/settings/goal",
            get(recommendations::get_goal).put(recommendations::update_goal),
        )
        .route(
            "/form",
            get(recommendations::get_form).put(recommendations::update_form),
        )
        .route("/selection", put(recommendations::select_exercise))
        .route("/webhook", post(webhooks::webhook_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
