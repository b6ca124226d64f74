//! Bounded retry for values that settle late.
//!
//! - [`PollConfig`] - interval, timeout and clock for a poll loop
//! - [`Poller`] - the loop itself: evaluate, compare, sleep, repeat
//! - [`Settled`] / [`PollState`] - how the loop ended
//!
//! # Example
//!
//! ```rust
//! use linkwise::polling::{PollConfig, PollState, Poller};
//! use linkwise::runtime::ManualTime;
//! use linkwise::value::Value;
//! use futures::FutureExt;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = PollConfig::new()
//!     .timeout(Duration::from_millis(300))
//!     .time_source(Arc::new(ManualTime::new()));
//!
//! let settled = futures::executor::block_on(Poller::new(config).until(
//!     || async { Ok(Value::from(1)) }.boxed(),
//!     || async { Ok(Value::from(2)) }.boxed(),
//!     |actual, expected| actual == expected,
//! ))
//! .unwrap();
//!
//! assert_eq!(settled.state, PollState::TimedOut);
//! assert_eq!(settled.attempts, 4);
//! ```

mod engine;

pub use engine::{PollState, Poller, Settled};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::runtime::{default_time_source, TimeSource};

/// Default pause between poll attempts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Shortest pause between poll attempts; shorter intervals are raised to it.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Default bound on a whole poll loop.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(4000);

/// Configuration for a poll loop.
#[derive(Clone)]
pub struct PollConfig {
    /// Pause between attempts.
    pub interval: Duration,
    /// Bound on the whole loop, measured from its first attempt.
    pub timeout: Duration,
    time: Arc<dyn TimeSource>,
}

impl PollConfig {
    /// Create a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pause between attempts, raised to at least [`MIN_INTERVAL`].
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Set the overall timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a specific clock.
    #[must_use]
    pub fn time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    /// The clock this configuration polls with.
    #[must_use]
    pub fn clock(&self) -> &dyn TimeSource {
        self.time.as_ref()
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            time: default_time_source(),
        }
    }
}

impl fmt::Debug for PollConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollConfig")
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
