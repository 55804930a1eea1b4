//! Bounded-time polling loop for external conditions.
//!
//! Used to wait for slow out-of-process signals (e.g. a body-tracking frame
//! source reporting a person in view) without busy-spinning. The predicate is
//! evaluated once per tick; cancellation is cooperative and observed at tick
//! granularity.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Terminal result of one watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The predicate reported true within the time budget.
    Satisfied,
    /// The budget ran out before the predicate reported true.
    TimedOut,
    /// Cancellation was requested; treated as "not satisfied" by callers.
    Cancelled,
}

impl WatchOutcome {
    pub fn is_satisfied(self) -> bool {
        self == WatchOutcome::Satisfied
    }
}

/// Poll `predicate` every `interval` until it returns true, the `timeout`
/// budget is exhausted, or `cancel` is triggered.
///
/// The loop suspends between ticks. Each tick deducts one full `interval`
/// from the budget, so a 1000 ms budget at 250 ms yields exactly four ticks.
pub async fn watch_outcome<F>(
    timeout: Duration,
    interval: Duration,
    mut predicate: F,
    cancel: &CancellationToken,
) -> WatchOutcome
where
    F: FnMut() -> bool,
{
    let mut remaining = timeout;

    while !remaining.is_zero() {
        remaining = remaining.saturating_sub(interval);
        tokio::time::sleep(interval).await;

        if cancel.is_cancelled() {
            return WatchOutcome::Cancelled;
        }

        if predicate() {
            return WatchOutcome::Satisfied;
        }
    }

    WatchOutcome::TimedOut
}

/// Boolean convenience over [`watch_outcome`]: true only when satisfied.
pub async fn watch_until<F>(
    timeout: Duration,
    interval: Duration,
    predicate: F,
    cancel: &CancellationToken,
) -> bool
where
    F: FnMut() -> bool,
{
    watch_outcome(timeout, interval, predicate, cancel)
        .await
        .is_satisfied()
}
