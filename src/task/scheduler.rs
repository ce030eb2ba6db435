//! Scheduler driver owning the repeating evaluator jobs.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use log::debug;
use log::error;
use log::info;
use log::warn;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;

use super::Job;

/// Runs registered jobs on independent timers against one process clock.
///
/// Jobs are data-independent; no cross-job coordination happens here and the
/// driver holds no subscriber state. A job's next tick cannot start before
/// the previous tick's fan-out returns, which keeps one job's
/// read-decide-write on a subscriber's dedup field effectively atomic.
pub struct Scheduler {
    running: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Starts a repeating timer for `job`.
    ///
    /// Every fire invokes `run_tick` exactly once, catching and logging any
    /// error so a single bad tick never stops the timer. A tick that fires
    /// more than `grace` past its deadline is skipped as stale instead of
    /// executed with stale intent.
    pub fn register_job(
        &self,
        interval: Duration,
        initial_delay: Duration,
        grace: Duration,
        job: Arc<dyn Job>,
    ) {
        let running = self.running.clone();
        info!(
            "Registering job `{}` with interval {:?}.",
            job.name(),
            interval
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + initial_delay, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let deadline = ticker.tick().await;
                if !running.load(Ordering::SeqCst) {
                    info!("Stopping job `{}`.", job.name());
                    break;
                }

                let lateness = Instant::now().saturating_duration_since(deadline);
                if lateness > grace {
                    warn!(
                        "Job `{}` tick is {:?} late; skipping stale tick.",
                        job.name(),
                        lateness
                    );
                    continue;
                }

                debug!("Running job `{}` tick.", job.name());
                if let Err(e) = job.run_tick().await {
                    error!("Error in job `{}` tick: {e:?}", job.name());
                }
            }
        });
    }

    /// Flips the running flag; each job loop observes it on its next tick.
    pub fn stop(&self) {
        info!("Stopping scheduler jobs.");
        self.running.store(false, Ordering::SeqCst);
    }
}
