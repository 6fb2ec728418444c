use serde::Deserialize;

use crate::clients::models::common::{CatalogExercise, SetRecord, WorkoutSession};

// Envelope used by GET /v1/exercises/{id}/last-session-sets and GET /v1/sessions/{id}/sets
#[derive(Debug, Deserialize)]
pub struct SetsResponse {
    pub sets: Vec<SetRecord>,
}

// Catalog entry envelope returned by GET /v1/exercises/{id}
#[derive(Debug, Deserialize)]
pub struct ExerciseApiResponse {
    pub exercise: CatalogExercise,
}

// GET /v1/sessions/open, `session` is null when nothing is open
#[derive(Debug, Deserialize)]
pub struct OpenSessionResponse {
    pub session: Option<WorkoutSession>,
}
