use std::sync::Arc;
use std::time::{Duration, Instant};
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    /// Cooldown elapsed; the next acquired call is a trial.
    HalfOpen,
}

#[derive(Debug)]
struct Inner {
    consecutive_failures: u64,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Stops calling the insight model after repeated failures, then lets a
/// trial call through once the cooldown has passed. Clones share state.
#[derive(Clone, Debug)]
pub struct CircuitBreaker {
    inner: Arc<Mutex<Inner>>,
    failure_threshold: u64,
    cooldown: Duration,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u64, cooldown: Duration) -> Self {
        CircuitBreaker {
            inner: Arc::new(Mutex::new(Inner {
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            })),
            failure_threshold: failure_threshold.max(1),
            cooldown,
        }
    }

    pub fn state(&self) -> BreakerState {
        let inner = self.inner.lock();
        match inner.opened_at {
            None => BreakerState::Closed,
            Some(at) if at.elapsed() >= self.cooldown => BreakerState::HalfOpen,
            Some(_) => BreakerState::Open,
        }
    }

    /// True while the cooldown is running.
    pub fn is_open(&self) -> bool {
        self.state() == BreakerState::Open
    }

    /// Permission to make a call. Always granted while closed; after the
    /// cooldown only one caller gets the trial until its result is recorded.
    pub fn try_acquire(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.opened_at {
            None => true,
            Some(at) if at.elapsed() < self.cooldown => false,
            Some(_) if inner.trial_in_flight => false,
            Some(_) => {
                inner.trial_in_flight = true;
                true
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures = 0;
        inner.opened_at = None;
        inner.trial_in_flight = false;
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures += 1;
        inner.trial_in_flight = false;
        let trial_failed = inner.opened_at.is_some();
        if trial_failed || inner.consecutive_failures >= self.failure_threshold {
            inner.opened_at = Some(Instant::now());
            tracing::warn!(
                failures = inner.consecutive_failures,
                cooldown_secs = self.cooldown.as_secs(),
                "Insight circuit opened"
            );
        }
    }

    pub fn failure_count(&self) -> u64 {
        self.inner.lock().consecutive_failures
    }
}

/// Exponential backoff between retries
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBackoff {
    initial_delay_ms: u64,
    max_delay_ms: u64,
    multiplier: f64,
}

impl ExponentialBackoff {
    pub fn new(initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        ExponentialBackoff {
            initial_delay_ms,
            max_delay_ms,
            multiplier: 2.0,
        }
    }

    /// Delay before retry number `attempt` (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = (self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32)) as u64;
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(100, 2000)
    }
}
