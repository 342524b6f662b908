#[cfg(test)]
mod tests {
    use crate::circuit_breaker::{BreakerState, CircuitBreaker, ExponentialBackoff};
    use std::time::Duration;

    #[test]
    fn test_circuit_breaker_initial_state() {
        let cb = CircuitBreaker::new(3, Duration::from_secs(60));
        assert!(!cb.is_open());
        assert_eq!(cb.state(), BreakerState::Closed);
        assert_eq!(cb.failure_count(), 0);
    }

    #[test]
    fn test_circuit_breaker_opens_after_threshold() {
        let cb = CircuitBreaker::new(3, Duration::from_secs(60));

        cb.record_failure();
        assert!(!cb.is_open());

        cb.record_failure();
        assert!(!cb.is_open());

        cb.record_failure();
        assert!(cb.is_open());
    }

    #[test]
    fn test_circuit_breaker_resets_on_success() {
        let cb = CircuitBreaker::new(3, Duration::from_secs(60));

        cb.record_failure();
        cb.record_failure();
        cb.record_success();

        assert!(!cb.is_open());
        assert_eq!(cb.failure_count(), 0);
    }

    #[test]
    fn test_circuit_breaker_half_open_after_cooldown() {
        let cb = CircuitBreaker::new(1, Duration::ZERO);
        cb.record_failure();
        assert_eq!(cb.state(), BreakerState::HalfOpen);
        assert!(!cb.is_open());

        cb.record_success();
        assert_eq!(cb.state(), BreakerState::Closed);
    }

    #[test]
    fn test_half_open_grants_a_single_trial() {
        let cb = CircuitBreaker::new(1, Duration::ZERO);
        assert!(cb.try_acquire());
        cb.record_failure();
        assert_eq!(cb.state(), BreakerState::HalfOpen);

        // first caller gets the trial, concurrent callers are turned away
        assert!(cb.try_acquire());
        assert!(!cb.try_acquire());
        assert!(!cb.clone().try_acquire());

        // a failed trial reopens and the next cooldown grants a new trial
        cb.record_failure();
        assert!(cb.try_acquire());
        cb.record_success();
        assert_eq!(cb.state(), BreakerState::Closed);
        assert!(cb.try_acquire());
        assert!(cb.try_acquire());
    }

    #[test]
    fn test_open_breaker_refuses_calls() {
        let cb = CircuitBreaker::new(1, Duration::from_secs(60));
        cb.record_failure();
        assert!(!cb.try_acquire());
    }

    #[test]
    fn test_clones_share_state() {
        let cb = CircuitBreaker::new(5, Duration::from_secs(60));
        for _ in 0..5 {
            cb.record_failure();
        }
        assert!(cb.is_open());
        // clones share state
        let other = cb.clone();
        other.record_success();
        assert!(!cb.is_open());
    }

    #[test]
    fn test_exponential_backoff() {
        let backoff = ExponentialBackoff::new(100, 5000);

        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_millis(800));

        // Should cap at max
        assert_eq!(backoff.delay_for_attempt(10), Duration::from_millis(5000));
    }
}
