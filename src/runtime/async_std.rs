//! async-std time for the polling engine.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use super::TimeSource;

/// async-std-based time source using real time.
#[derive(Debug, Clone)]
pub struct AsyncStdTime {
    /// Offset from the start time.
    start: Instant,
}

impl AsyncStdTime {
    /// Create a new async-std time source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for AsyncStdTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for AsyncStdTime {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(::async_std::task::sleep(duration))
    }
}
