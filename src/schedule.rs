use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Runs a callback repeatedly until the returned subscription is cancelled.
pub trait Scheduler {
    type Subscription;

    fn schedule(&self, period: Duration, callback: Box<dyn FnMut()>) -> Self::Subscription;

    fn cancel(&self, subscription: Self::Subscription);
}

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Ticks from a task on the current `LocalSet`.
///
/// Must be used from inside `LocalSet::run_until` or `LocalSet::block_on`.
/// Ticks missed while the loop was busy are delivered once, late.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskScheduler;

/// Aborts the ticking task when cancelled or dropped.
#[derive(Debug)]
pub struct Subscription(JoinHandle<()>);

impl Drop for Subscription {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl Scheduler for TaskScheduler {
    type Subscription = Subscription;

    fn schedule(&self, period: Duration, mut callback: Box<dyn FnMut()>) -> Subscription {
        let period = period.max(MIN_PERIOD);

        tracing::trace!(?period, "Scheduling tick");

        // The first tick of a plain interval completes immediately.
        let first = Instant::now() + period;
        let handle = tokio::task::spawn_local(async move {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                callback();
            }
        });

        Subscription(handle)
    }

    fn cancel(&self, subscription: Subscription) {
        tracing::trace!("Cancelling tick");
        drop(subscription);
    }
}
