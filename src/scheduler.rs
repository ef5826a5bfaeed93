use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::SchedulerConfig;
use crate::price_checker::{PriceChecker, SweepReport};

/// Runs the price sweep on a fixed interval in the background.
///
/// At most one sweep runs at a time: a tick (or a [`PriceScheduler::run_now`]
/// call) that arrives while a sweep is in progress is skipped.
pub struct PriceScheduler {
    scheduler: JobScheduler,
    checker: Arc<PriceChecker>,
    running: Arc<AtomicBool>,
    config: SchedulerConfig,
}

/// Clears the running flag when the sweep ends, including on panic.
struct SweepGuard(Arc<AtomicBool>);

impl SweepGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SweepGuard(Arc::clone(flag)))
    }
}

impl Drop for SweepGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PriceScheduler {
    pub async fn new(checker: Arc<PriceChecker>, config: SchedulerConfig) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            checker,
            running: Arc::new(AtomicBool::new(false)),
            config,
        })
    }

    pub async fn start(&mut self) -> Result<()> {
        let checker = Arc::clone(&self.checker);
        let running = Arc::clone(&self.running);
        let interval = Duration::from_secs(self.config.check_interval_secs);

        let job = Job::new_repeated_async(interval, move |_uuid, _l| {
            let checker = Arc::clone(&checker);
            let running = Arc::clone(&running);

            Box::pin(async move {
                if let Err(e) = Self::guarded_sweep(&checker, &running).await {
                    tracing::error!("Scheduled price check failed: {}", e);
                }
            })
        })?;

        self.scheduler.add(job).await?;
        self.scheduler.start().await?;
        tracing::info!(
            "Price scheduler started, checking every {}s",
            self.config.check_interval_secs
        );
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        tracing::info!("Price scheduler shutdown");
        Ok(())
    }

    /// Runs one sweep immediately. Returns `None` when a sweep was already running.
    pub async fn run_now(&self) -> Result<Option<SweepReport>> {
        Self::guarded_sweep(&self.checker, &self.running).await
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    async fn guarded_sweep(checker: &PriceChecker, running: &Arc<AtomicBool>) -> Result<Option<SweepReport>> {
        let Some(_guard) = SweepGuard::acquire(running) else {
            tracing::warn!("Previous price check still running; skipping this run");
            return Ok(None);
        };

        let report = checker.run_sweep().await?;
        Ok(Some(report))
    }
}
