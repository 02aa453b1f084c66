//! Daily trigger for the bulk refresh.

use std::sync::Arc;

use chrono::FixedOffset;
use cpstats_core::AppConfig;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::job::{BulkRefreshJob, RefreshError};

/// When the bulk refresh fires: a six-field cron expression evaluated in a
/// fixed UTC offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSchedule {
    pub cron: String,
    pub utc_offset: FixedOffset,
}

impl RefreshSchedule {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cron: config.refresh_cron.clone(),
            utc_offset: config.refresh_utc_offset,
        }
    }
}

/// Builds and starts the scheduler with the bulk refresh registered.
///
/// The returned [`JobScheduler`] must be kept alive for the lifetime of the
/// process; dropping it stops the job.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the cron expression is invalid or the
/// scheduler cannot be initialised or started.
pub async fn build_scheduler(
    job: Arc<BulkRefreshJob>,
    schedule: &RefreshSchedule,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    scheduler.add(refresh_job(job, schedule)?).await?;
    scheduler.start().await?;

    tracing::info!(
        cron = %schedule.cron,
        utc_offset = %schedule.utc_offset,
        "scheduler: bulk refresh registered"
    );
    Ok(scheduler)
}

fn refresh_job(
    job: Arc<BulkRefreshJob>,
    schedule: &RefreshSchedule,
) -> Result<Job, JobSchedulerError> {
    Job::new_async_tz(
        schedule.cron.as_str(),
        schedule.utc_offset,
        move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                run_scheduled_refresh(&job).await;
            })
        },
    )
}

async fn run_scheduled_refresh(job: &BulkRefreshJob) {
    tracing::info!("scheduler: starting daily profile refresh");
    match job.refresh_all_profiles().await {
        Ok(outcome) => tracing::info!(
            success = outcome.success_count,
            failed = outcome.error_count,
            users = outcome.total_users_processed,
            "scheduler: daily profile refresh complete"
        ),
        Err(RefreshError::AlreadyRunning) => {
            tracing::warn!("scheduler: previous refresh still running; skipping this tick");
        }
        Err(e) => tracing::error!(error = %e, "scheduler: daily profile refresh failed"),
    }
}
