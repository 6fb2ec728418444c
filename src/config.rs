use std::env;

use crate::services::goals::TrainingGoal;

#[derive(Debug, Clone)]
pub struct Config {
    pub workout_log_api_key: String,
    pub workout_log_api_url: String,
    pub webhook_token: String,
    pub port: String,
    pub session_sync_cron: String,
    pub default_goal: TrainingGoal,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let workout_log_api_key = env::var("WORKOUT_LOG_API_KEY")?;
        let webhook_token = env::var("WEBHOOK_TOKEN")?;
        let port = env::var("PORT")?;
        let base_url = env::var("WORKOUT_LOG_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let session_sync_cron =
            env::var("SESSION_SYNC_CRON").unwrap_or_else(|_| "0 * * * * *".to_string());
        let default_goal = match env::var("DEFAULT_GOAL") {
            Ok(value) => value.parse()?,
            Err(_) => TrainingGoal::default(),
        };

        Ok(Self {
            workout_log_api_key,
            workout_log_api_url: base_url,
            webhook_token,
            port,
            session_sync_cron,
            default_goal,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            workout_log_api_key: "test-key".to_string(),
            workout_log_api_url: "http://localhost:8080".to_string(),
            webhook_token: "test-token".to_string(),
            port: "0".to_string(),
            session_sync_cron: "0 * * * * *".to_string(),
            default_goal: TrainingGoal::Hypertrophy,
        }
    }
}
