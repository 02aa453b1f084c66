use std::sync::Arc;

use cpstats_sync::{build_scheduler, RefreshSchedule};

use crate::AppContext;

/// Starts the scheduler and blocks until ctrl-c or SIGTERM.
pub(crate) async fn run_serve(ctx: &AppContext) -> anyhow::Result<()> {
    let job = Arc::new(ctx.refresh_job());
    let schedule = RefreshSchedule::from_config(&ctx.config);
    let mut scheduler = build_scheduler(job, &schedule).await?;

    tracing::info!(
        users_path = %ctx.config.users_path.display(),
        "cpstats scheduler running; press ctrl-c to stop"
    );
    shutdown_signal().await?;

    scheduler.shutdown().await?;
    Ok(())
}

pub(crate) async fn run_refresh_all(ctx: &AppContext) -> anyhow::Result<()> {
    let outcome = ctx.refresh_job().trigger_manual_refresh().await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    tracing::info!("received shutdown signal, stopping scheduler");
    Ok(())
}
