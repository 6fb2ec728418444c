use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ExerciseId = i64;
pub type SessionId = i64;

/// One logged set. Owned by the workout log; never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub id: i64,
    pub session_id: SessionId,
    pub exercise_id: ExerciseId,
    pub set_number: u32, // order within the session for this exercise
    pub reps: u32,
    pub weight: f64,
    pub rpe: Option<f64>,
    pub timestamp_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: SessionId,
    pub date_utc: DateTime<Utc>,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogExercise {
    pub id: ExerciseId,
    pub name: String,
    pub is_compound: bool,
    pub body_part: Option<String>,
    pub default_min_increment_kg: Option<f64>,
}

/// What the progression rules need to know about an exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseClassification {
    pub is_compound: bool,
    pub min_increment_override: Option<f64>,
}

impl Default for ExerciseClassification {
    // Unknown exercises get the larger compound jump.
    fn default() -> Self {
        Self {
            is_compound: true,
            min_increment_override: None,
        }
    }
}

impl CatalogExercise {
    pub fn classification(&self) -> ExerciseClassification {
        ExerciseClassification {
            is_compound: self.is_compound,
            min_increment_override: self.default_min_increment_kg.filter(|value| *value > 0.0),
        }
    }
}
