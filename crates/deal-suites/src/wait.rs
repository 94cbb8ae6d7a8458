//! Synchronization with asynchronous CRM work such as alert generation.

use std::future::Future;
use std::time::Duration;

use deal_config::{WaitConfig, WaitMode};

/// How long to wait before trusting a read that races server-side processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// One fixed pause, then one read.
    Fixed(Duration),
    /// Read after `initial`, then keep reading with doubling backoff
    /// (capped at `max`) until the state is ready or attempts run out.
    Poll {
        max_attempts: u32,
        initial: Duration,
        max: Duration,
    },
}

impl WaitStrategy {
    /// Build from the `[wait]` section; `settle` is the fixed-mode pause.
    #[must_use]
    pub fn from_config(config: &WaitConfig, settle: Duration) -> Self {
        match config.strategy {
            WaitMode::Fixed => Self::Fixed(settle),
            WaitMode::Poll => Self::Poll {
                max_attempts: config.max_attempts.max(1),
                initial: config.initial_backoff(),
                max: config.max_backoff(),
            },
        }
    }

    /// Delay before the `attempt`-th read (zero-based).
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Poll { initial, max, .. } => {
                let factor = 2u32.saturating_pow(attempt);
                initial.saturating_mul(factor).min(max)
            }
        }
    }

    const fn attempts(&self) -> u32 {
        match *self {
            Self::Fixed(_) => 1,
            Self::Poll { max_attempts, .. } => max_attempts,
        }
    }

    /// Run `read` until `ready` accepts its value.
    ///
    /// Returns the last value `read` produced, ready or not; `None` only
    /// when every read failed.
    pub async fn until<T, F, Fut>(&self, mut read: F, ready: impl Fn(&T) -> bool) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let mut last = None;
        for attempt in 0..self.attempts() {
            tokio::time::sleep(self.delay_before(attempt)).await;
            if let Some(value) = read().await {
                if ready(&value) {
                    return Some(value);
                }
                last = Some(value);
            }
            tracing::debug!(attempt, "awaited state not reached yet");
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    const POLL: WaitStrategy = WaitStrategy::Poll {
        max_attempts: 4,
        initial: Duration::from_millis(1),
        max: Duration::from_millis(3),
    };

    #[test]
    fn poll_backoff_doubles_up_to_the_cap() {
        let delays: Vec<Duration> = (0..4).map(|n| POLL.delay_before(n)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(1),
                Duration::from_millis(2),
                Duration::from_millis(3),
                Duration::from_millis(3),
            ]
        );
    }

    #[test]
    fn fixed_mode_mirrors_the_settle_time() {
        let config = WaitConfig::default();
        let strategy = WaitStrategy::from_config(&config, Duration::from_secs(2));
        assert_eq!(strategy, WaitStrategy::Fixed(Duration::from_secs(2)));
        assert_eq!(strategy.attempts(), 1);
    }

    #[tokio::test]
    async fn poll_stops_once_ready() {
        let calls = Cell::new(0u32);
        let found = POLL
            .until(
                || {
                    calls.set(calls.get() + 1);
                    let n = calls.get();
                    async move { Some(n) }
                },
                |n| *n >= 2,
            )
            .await;
        assert_eq!(found, Some(2));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn poll_returns_last_value_when_never_ready() {
        let calls = Cell::new(0u32);
        let found = POLL
            .until(
                || {
                    calls.set(calls.get() + 1);
                    let n = calls.get();
                    async move { Some(n) }
                },
                |_| false,
            )
            .await;
        assert_eq!(found, Some(4));
    }

    #[tokio::test]
    async fn failing_read_yields_none() {
        let found: Option<u32> = WaitStrategy::Fixed(Duration::ZERO)
            .until(|| async { None }, |_| true)
            .await;
        assert_eq!(found, None);
    }
}
