use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info, warn};

use crate::config::SchedulerConfig;
use crate::services::DsarService;

/// Background job runner. Currently one job: the DSAR deadline sweep, which
/// flags open data-subject requests past their statutory response window.
pub struct Scheduler {
    dsar_service: Arc<DsarService>,
    config: SchedulerConfig,
}

impl Scheduler {
    #[must_use]
    pub const fn new(dsar_service: Arc<DsarService>, config: SchedulerConfig) -> Self {
        Self {
            dsar_service,
            config,
        }
    }

    /// Starts the cron scheduler and parks the task; callers run this on a
    /// dedicated tokio task and abort it on shutdown.
    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler disabled by config");
            return Ok(());
        }

        let scheduler = JobScheduler::new().await?;

        let dsar_service = self.dsar_service.clone();
        let job = Job::new_async(self.config.deadline_check_cron.as_str(), move |_id, _lock| {
            let dsar_service = dsar_service.clone();
            Box::pin(async move {
                match dsar_service.sweep_overdue().await {
                    Ok(0) => debug!("DSAR deadline sweep: nothing overdue"),
                    Ok(count) => warn!(count, "DSAR deadline sweep found overdue requests"),
                    Err(e) => error!("DSAR deadline sweep failed: {e}"),
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        info!(
            cron = %self.config.deadline_check_cron,
            "Scheduler started"
        );

        // Keep the scheduler alive; dropping it would cancel its jobs.
        loop {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        }
    }

    /// Runs the deadline sweep once, for the CLI `check-deadlines` command.
    pub async fn run_once(&self) -> Result<usize> {
        self.dsar_service.sweep_overdue().await
    }
}
