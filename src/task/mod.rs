//! Background jobs: the scheduler driver and the periodic evaluators.

pub mod daily_digest;
pub mod history_recorder;
pub mod scheduler;
pub mod weather_alerts;

use async_trait::async_trait;

/// A unit of periodic work driven by the [`scheduler::Scheduler`].
///
/// One tick evaluates every active subscriber. Implementations must isolate
/// per-subscriber failures inside the tick so siblings still get served; an
/// error returned here is the last-resort path and only ends the tick, never
/// the timer.
#[async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run_tick(&self) -> anyhow::Result<()>;
}
