//! Recurring poll scheduling.
//!
//! The scheduler is either Idle (not yet started, or its configuration
//! source is gone) or Armed with a pending timer. On start it fires one
//! cycle immediately and arms the timer; every elapse fires again. An
//! interval change observed mid-wait cancels the pending timer and re-arms
//! with the new interval without firing.

use std::sync::Arc;
use std::time::Duration;

use pickwatch_core::{AppConfig, CatalogFile};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::fetch::AvailabilityFetcher;
use crate::version::VersionChecker;

/// One trigger of a poll cycle, fire-and-forget.
///
/// Implementations spawn the work and return immediately; nothing serializes
/// overlapping cycles, so a slow response from an earlier fire may settle
/// after a later one. The later settle wins the published state.
pub trait CycleDriver: Send + Sync + 'static {
    fn fire(&self);
}

/// Drives a [`CycleDriver`] on the configured interval.
pub struct PollScheduler<D: CycleDriver> {
    driver: D,
    config: watch::Receiver<AppConfig>,
}

impl<D: CycleDriver> PollScheduler<D> {
    pub fn new(driver: D, config: watch::Receiver<AppConfig>) -> Self {
        Self { driver, config }
    }

    /// Run until the configuration sender is dropped. Never returns during
    /// normal operation; teardown is the hosting process's lifecycle.
    pub async fn run(mut self) {
        loop {
            let mut interval_mins = self.config.borrow().poll_interval_mins.max(1);
            self.driver.fire();

            let sleep = tokio::time::sleep(interval(interval_mins));
            tokio::pin!(sleep);

            loop {
                tokio::select! {
                    () = &mut sleep => break,
                    changed = self.config.changed() => {
                        if changed.is_err() {
                            tracing::debug!("configuration source closed; scheduler going idle");
                            return;
                        }
                        let new_mins = self.config.borrow().poll_interval_mins.max(1);
                        if new_mins != interval_mins {
                            tracing::info!(minutes = new_mins, "poll interval changed; re-arming timer");
                            interval_mins = new_mins;
                            sleep.as_mut().reset(Instant::now() + interval(new_mins));
                        }
                    }
                }
            }
        }
    }
}

fn interval(mins: u64) -> Duration {
    Duration::from_secs(mins.saturating_mul(60))
}

/// Production driver: each fire spawns one availability cycle and one
/// version check, reading a fresh configuration snapshot at fire time.
pub struct FetchDriver {
    fetcher: Arc<AvailabilityFetcher>,
    checker: Arc<VersionChecker>,
    catalog: Arc<CatalogFile>,
    config: watch::Receiver<AppConfig>,
}

impl FetchDriver {
    #[must_use]
    pub fn new(
        fetcher: Arc<AvailabilityFetcher>,
        checker: Arc<VersionChecker>,
        catalog: Arc<CatalogFile>,
        config: watch::Receiver<AppConfig>,
    ) -> Self {
        Self {
            fetcher,
            checker,
            catalog,
            config,
        }
    }
}

impl CycleDriver for FetchDriver {
    fn fire(&self) {
        let fetcher = Arc::clone(&self.fetcher);
        let catalog = Arc::clone(&self.catalog);
        let config = self.config.borrow().clone();
        tokio::spawn(async move {
            // Failure is already published and logged by the fetcher; the
            // timer provides the retry.
            let _ = fetcher.run_cycle(&config, &catalog).await;
        });

        let checker = Arc::clone(&self.checker);
        tokio::spawn(async move {
            checker.check().await;
        });
    }
}
