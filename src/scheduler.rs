use tokio_cron_scheduler::{Job, JobScheduler};

use crate::api::AppState;

/// Polls the workout log for the open session so anchors are dropped even when a
/// session webhook never arrives.
pub async fn start_scheduler(state: AppState) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;
    let schedule = state.config.session_sync_cron.clone();

    scheduler
        .add(Job::new_async(schedule.as_str(), move |_uuid, _l| {
            let state = state.clone();
            Box::pin(async move {
                if let Err(e) = run_sync(&state).await {
                    tracing::error!(error = %e, "cron.session_sync_failed");
                }
            })
        })?)
        .await?;

    scheduler.start().await?;
    Ok(scheduler)
}

pub async fn run_sync(state: &AppState) -> anyhow::Result<()> {
    let session = state.workout_log.open_session().await?;
    let session_id = session.map(|session| session.id);

    if state.progressive_overload_service.sync_session(session_id) {
        tracing::info!(session = ?session_id, "cron.session_changed");
    } else {
        tracing::debug!(session = ?session_id, "cron.session_unchanged");
    }

    Ok(())
}
