use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::clients::models::common::{
    ExerciseClassification, ExerciseId, SessionId, SetRecord, WorkoutSession,
};
use crate::clients::models::responses::{
    ExerciseApiResponse, OpenSessionResponse, SetsResponse,
};
use crate::config::Config;

const EXERCISES_ENDPOINT: &str = "/v1/exercises/";
const SESSIONS_ENDPOINT: &str = "/v1/sessions/";

#[derive(Debug, Error)]
pub enum WorkoutLogError {
    #[error("workout log request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid workout log url: {0}")]
    Url(String),

    #[error("workout log responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse workout log response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read side of the workout log the recommendation engine depends on.
#[async_trait]
pub trait WorkoutLog: Send + Sync {
    /// All sets of the most recent session, other than `exclude_session`, that contains the
    /// exercise. Empty when the exercise was never logged.
    async fn prior_session_sets(
        &self,
        exercise_id: ExerciseId,
        exclude_session: Option<SessionId>,
    ) -> Result<Vec<SetRecord>, WorkoutLogError>;

    /// Every set logged in a session, across all exercises.
    async fn session_sets(&self, session_id: SessionId) -> Result<Vec<SetRecord>, WorkoutLogError>;

    async fn exercise_classification(
        &self,
        exercise_id: ExerciseId,
    ) -> Result<ExerciseClassification, WorkoutLogError>;

    async fn open_session(&self) -> Result<Option<WorkoutSession>, WorkoutLogError>;
}

#[derive(Clone)]
pub struct WorkoutLogClient {
    http: Client,
    base: Url,
    api_key: String,
}

impl WorkoutLogClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base: Url::parse(&config.workout_log_api_url)?,
            api_key: config.workout_log_api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, WorkoutLogError> {
        self.base
            .join(path)
            .map_err(|e| WorkoutLogError::Url(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, WorkoutLogError> {
        tracing::debug!(url = %url, "workout_log.request");

        let response = self
            .http
            .get(url)
            .header("api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(WorkoutLogError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WorkoutLog for WorkoutLogClient {
    async fn prior_session_sets(
        &self,
        exercise_id: ExerciseId,
        exclude_session: Option<SessionId>,
    ) -> Result<Vec<SetRecord>, WorkoutLogError> {
        let mut url = self.endpoint(&format!(
            "{}{}/last-session-sets",
            EXERCISES_ENDPOINT, exercise_id
        ))?;
        if let Some(session_id) = exclude_session {
            url.query_pairs_mut()
                .append_pair("exclude_session", &session_id.to_string());
        }

        let response: SetsResponse = self.get_json(url).await?;
        Ok(response.sets)
    }

    async fn session_sets(&self, session_id: SessionId) -> Result<Vec<SetRecord>, WorkoutLogError> {
        let url = self.endpoint(&format!("{}{}/sets", SESSIONS_ENDPOINT, session_id))?;
        let response: SetsResponse = self.get_json(url).await?;
        Ok(response.sets)
    }

    async fn exercise_classification(
        &self,
        exercise_id: ExerciseId,
    ) -> Result<ExerciseClassification, WorkoutLogError> {
        let url = self.endpoint(&format!("{}{}", EXERCISES_ENDPOINT, exercise_id))?;

        match self.get_json::<ExerciseApiResponse>(url).await {
            Ok(response) => {
                let exercise = response.exercise;
                tracing::debug!(
                    exercise_id = exercise.id,
                    name = %exercise.name,
                    body_part = ?exercise.body_part,
                    is_compound = exercise.is_compound,
                    "workout_log.exercise_classified"
                );
                Ok(exercise.classification())
            }
            Err(WorkoutLogError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                tracing::debug!(exercise_id, "workout_log.exercise_not_in_catalog");
                Ok(ExerciseClassification::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn open_session(&self) -> Result<Option<WorkoutSession>, WorkoutLogError> {
        let url = self.endpoint(&format!("{}open", SESSIONS_ENDPOINT))?;
        let response: OpenSessionResponse = self.get_json(url).await?;
        Ok(response.session.filter(|session| !session.is_closed))
    }
}
