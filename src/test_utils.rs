use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::clients::models::common::{
    ExerciseClassification, ExerciseId, SessionId, SetRecord, WorkoutSession,
};
use crate::clients::workout_log::{WorkoutLog, WorkoutLogError};

/// Workout log kept in memory. Counts every trait call so tests can assert on traffic.
#[derive(Default)]
pub struct InMemoryWorkoutLog {
    sets: Mutex<Vec<SetRecord>>,
    catalog: Mutex<HashMap<ExerciseId, ExerciseClassification>>,
    open_session: Mutex<Option<SessionId>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryWorkoutLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a set, numbering it after the previous one for the same session and exercise.
    pub fn log_set(
        &self,
        session_id: SessionId,
        exercise_id: ExerciseId,
        weight: f64,
        reps: u32,
        rpe: Option<f64>,
    ) -> SetRecord {
        let mut sets = self.sets.lock().unwrap();
        let set_number = sets
            .iter()
            .filter(|s| s.session_id == session_id && s.exercise_id == exercise_id)
            .map(|s| s.set_number)
            .max()
            .unwrap_or(0)
            + 1;
        let start = Utc.with_ymd_and_hms(2026, 10, 1, 7, 0, 0).unwrap();

        let set = SetRecord {
            id: sets.len() as i64 + 1,
            session_id,
            exercise_id,
            set_number,
            reps,
            weight,
            rpe,
            timestamp_utc: start
                + Duration::days(session_id)
                + Duration::minutes(sets.len() as i64),
        };
        sets.push(set.clone());
        set
    }

    pub fn classify(&self, exercise_id: ExerciseId, is_compound: bool, min_increment: Option<f64>) {
        self.catalog.lock().unwrap().insert(
            exercise_id,
            ExerciseClassification {
                is_compound,
                min_increment_override: min_increment,
            },
        );
    }

    pub fn open(&self, session_id: SessionId) {
        *self.open_session.lock().unwrap() = Some(session_id);
    }

    pub fn close(&self) {
        *self.open_session.lock().unwrap() = None;
    }

    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<(), WorkoutLogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(WorkoutLogError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "workout log offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WorkoutLog for InMemoryWorkoutLog {
    async fn prior_session_sets(
        &self,
        exercise_id: ExerciseId,
        exclude_session: Option<SessionId>,
    ) -> Result<Vec<SetRecord>, WorkoutLogError> {
        self.record_call()?;
        let sets = self.sets.lock().unwrap();

        let latest_session = sets
            .iter()
            .filter(|s| s.exercise_id == exercise_id && Some(s.session_id) != exclude_session)
            .max_by_key(|s| s.timestamp_utc)
            .map(|s| s.session_id);

        let Some(session_id) = latest_session else {
            return Ok(Vec::new());
        };

        let mut found: Vec<SetRecord> = sets
            .iter()
            .filter(|s| s.session_id == session_id && s.exercise_id == exercise_id)
            .cloned()
            .collect();
        found.sort_by_key(|s| s.set_number);
        Ok(found)
    }

    async fn session_sets(&self, session_id: SessionId) -> Result<Vec<SetRecord>, WorkoutLogError> {
        self.record_call()?;
        Ok(self
            .sets
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn exercise_classification(
        &self,
        exercise_id: ExerciseId,
    ) -> Result<ExerciseClassification, WorkoutLogError> {
        self.record_call()?;
        Ok(self
            .catalog
            .lock()
            .unwrap()
            .get(&exercise_id)
            .copied()
            .unwrap_or_default())
    }

    async fn open_session(&self) -> Result<Option<WorkoutSession>, WorkoutLogError> {
        self.record_call()?;
        Ok(self
            .open_session
            .lock()
            .unwrap()
            .map(|id| WorkoutSession {
                id,
                date_utc: Utc::now(),
                notes: None,
                is_closed: false,
            }))
    }
}
