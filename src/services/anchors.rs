use std::collections::HashMap;

use crate::clients::models::common::{ExerciseId, SessionId};
use crate::services::estimator::Performance;

/// Where an exercise stands within the current session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorState {
    NoAnchor,
    Anchored(Performance),
}

/// Per-session memory of the reference performance for each exercise.
///
/// Anchors belong to one session scope (`None` while no session is open) and are dropped
/// as soon as that scope changes.
#[derive(Debug, Default)]
pub struct SessionAnchorStore {
    session_id: Option<SessionId>,
    anchors: HashMap<ExerciseId, Performance>,
}

impl SessionAnchorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn state(&self, exercise_id: ExerciseId) -> AnchorState {
        match self.get(exercise_id) {
            Some(performance) => AnchorState::Anchored(performance),
            None => AnchorState::NoAnchor,
        }
    }

    pub fn get(&self, exercise_id: ExerciseId) -> Option<Performance> {
        self.anchors.get(&exercise_id).copied()
    }

    /// Anchors the exercise unless it already is. Returns whether this call wrote it.
    pub fn set(&mut self, exercise_id: ExerciseId, performance: Performance) -> bool {
        if self.anchors.contains_key(&exercise_id) {
            return false;
        }
        self.anchors.insert(exercise_id, performance);
        true
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    /// Adopts `session_id` as the active scope, clearing every anchor if it changed.
    pub fn sync_session(&mut self, session_id: Option<SessionId>) -> bool {
        if self.session_id == session_id {
            return false;
        }

        tracing::info!(
            previous_session = ?self.session_id,
            session = ?session_id,
            dropped_anchors = self.anchors.len(),
            "anchors.session_changed"
        );
        self.session_id = session_id;
        self.clear();
        true
    }
}
