//! Process-wide rate gate for the routing-mismatch debug log.
//!
//! Intentionally a single process-global instance per deployment, not
//! per session: the point is to protect operators from a log flood when
//! many sessions hit the same guard concurrently.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Guards an action so it fires at most once per `interval`, tracked with
/// a single mutex-protected timestamp.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter that allows at most one acquisition per
    /// `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Attempt to acquire the gate. Returns `true` if the caller should
    /// emit, `false` if the interval hasn't elapsed since the last
    /// successful acquisition.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let should_emit = match *last {
            Some(prev) => now.duration_since(prev) >= self.interval,
            None => true,
        };
        if should_emit {
            *last = Some(now);
        }
        should_emit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn first_acquisition_always_succeeds() {
        let limiter = RateLimiter::new(Duration::from_secs(10));
        assert!(limiter.try_acquire());
    }

    #[test]
    fn second_acquisition_within_interval_is_denied() {
        let limiter = RateLimiter::new(Duration::from_secs(10));
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn acquisition_after_interval_succeeds() {
        let limiter = RateLimiter::new(Duration::from_millis(20));
        assert!(limiter.try_acquire());
        thread::sleep(Duration::from_millis(30));
        assert!(limiter.try_acquire());
    }
}
