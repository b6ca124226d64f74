//! smol time for the polling engine.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use super::TimeSource;

/// smol-based time source using real time.
#[derive(Debug, Clone)]
pub struct SmolTime {
    /// Offset from the start time.
    start: Instant,
}

impl SmolTime {
    /// Create a new smol time source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SmolTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SmolTime {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            ::smol::Timer::after(duration).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polling::{PollConfig, PollState, Poller};
    use crate::value::Value;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_smol_sleep() {
        let time = SmolTime::new();
        let now = time.now();
        ::smol::block_on(time.sleep(Duration::from_millis(10)));
        assert!(time.now() >= now + Duration::from_millis(10));
    }

    #[test]
    fn test_poller_on_smol_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = PollConfig::new()
            .interval(Duration::from_millis(5))
            .timeout(Duration::from_secs(2))
            .time_source(Arc::new(SmolTime::new()));

        let settled = ::smol::block_on(Poller::new(config).until(
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(Value::from(n)) }.boxed()
            },
            || async { Ok(Value::from(2)) }.boxed(),
            Value::deep_eq,
        ))
        .unwrap();

        assert!(settled.passed());
        assert_eq!(settled.attempts, 3);
        assert!(settled.elapsed >= Duration::from_millis(10));
    }

    #[test]
    fn test_poller_times_out_on_smol_time() {
        let config = PollConfig::new()
            .interval(Duration::from_millis(10))
            .timeout(Duration::from_millis(50))
            .time_source(Arc::new(SmolTime::new()));

        let settled = ::smol::block_on(Poller::new(config).until(
            || async { Ok(Value::from("a")) }.boxed(),
            || async { Ok(Value::from("b")) }.boxed(),
            Value::deep_eq,
        ))
        .unwrap();

        assert_eq!(settled.state, PollState::TimedOut);
        assert_eq!(settled.expected, Value::from("b"));
        assert!(settled.elapsed >= Duration::from_millis(50));
    }
}
