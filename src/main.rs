use std::sync::Arc;

use crate::api::AppState;
use crate::clients::workout_log::WorkoutLogClient;
use crate::config::Config;

mod api;
mod clients;
mod config;
mod scheduler;
mod services;
#[cfg(test)]
mod test_utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let workout_log = Arc::new(WorkoutLogClient::new(&config)?);
    let state = AppState::new(config.clone(), workout_log);

    // Pick up a session that was already open before this process started.
    if let Err(e) = scheduler::run_sync(&state).await {
        tracing::warn!(error = %e, "startup.session_sync_failed");
    }
    let _scheduler = scheduler::start_scheduler(state.clone()).await?;

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = %config.port, default_goal = %config.default_goal, "server.listening");
    axum::serve(listener, app).await?;
    Ok(())
}
