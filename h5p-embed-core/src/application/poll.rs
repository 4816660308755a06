use std::future::Future;

/// Result of a bounded polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Condition held after `waits` sleeps
    Ready { waits: u32 },
    /// Condition never held within the budget
    Exhausted { waits: u32 },
}

impl PollOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, PollOutcome::Ready { .. })
    }
}

/// Check `condition`, sleeping between checks, at most `budget` sleeps
///
/// The condition is checked once up front and once after every sleep.
/// Dropping the returned future cancels the loop.
pub async fn poll_until<C, S, F>(budget: u32, interval_ms: u32, condition: C, sleep: S) -> PollOutcome
where
    C: Fn() -> bool,
    S: Fn(u32) -> F,
    F: Future<Output = ()>,
{
    let mut waits = 0;
    while !condition() {
        if waits >= budget {
            return PollOutcome::Exhausted { waits };
        }
        sleep(interval_ms).await;
        waits += 1;
    }
    PollOutcome::Ready { waits }
}
