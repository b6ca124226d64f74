//! Runtime-agnostic time for the polling engine.
//!
//! Deferred assertions sleep between attempts and race each attempt against a
//! deadline. Both go through [`TimeSource`], so the engine works with Tokio,
//! async-std, smol, or a manually stepped clock without coupling to any one
//! of them.
//!
//! # Implementations
//!
//! - [`ManualTime`] - virtual time that jumps forward when slept on
//! - `TokioTime` - real (or paused) tokio time (with `tokio` feature)
//! - `AsyncStdTime` - real async-std time (with `async-std` feature)
//! - `SmolTime` - real smol time (with `smol` feature)

#![allow(clippy::cast_possible_truncation)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A source of time for async operations.
///
/// This trait abstracts over different time implementations, allowing
/// code to work with both real time and virtual time.
pub trait TimeSource: Send + Sync {
    /// Get the current time as a duration since an epoch.
    fn now(&self) -> Duration;

    /// Create a future that completes after the given duration.
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// Create a future that completes at the given instant.
    fn sleep_until(&self, deadline: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let now = self.now();
        if deadline <= now {
            Box::pin(std::future::ready(()))
        } else {
            self.sleep(deadline - now)
        }
    }
}

/// Virtual time that advances only when slept on or advanced by hand.
///
/// Sleeping completes on the first poll and moves the clock to the sleep's
/// target, so a poll loop driven by `ManualTime` runs to its deadline
/// without waiting. Clones share the same time.
///
/// # Example
///
/// ```rust
/// use linkwise::runtime::{ManualTime, TimeSource};
/// use std::time::Duration;
///
/// let time = ManualTime::new();
/// futures::executor::block_on(time.sleep(Duration::from_millis(250)));
/// assert_eq!(time.now(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    /// The current time in nanoseconds.
    current_nanos: Arc<AtomicU64>,
}

impl ManualTime {
    /// Create a manual clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a specific starting time.
    #[must_use]
    pub fn with_start_time(start: Duration) -> Self {
        Self {
            current_nanos: Arc::new(AtomicU64::new(start.as_nanos() as u64)),
        }
    }

    /// Advance time by the given duration.
    pub fn advance(&self, duration: Duration) {
        self.current_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Set time to a specific point.
    pub fn set(&self, time: Duration) {
        self.current_nanos
            .store(time.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.current_nanos.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let target = self.now() + duration;
        let current = Arc::clone(&self.current_nanos);
        Box::pin(async move {
            current.fetch_max(target.as_nanos() as u64, Ordering::SeqCst);
        })
    }
}

/// The time source deferred assertions use unless configured otherwise.
///
/// Tokio when the `tokio` feature is enabled, else async-std, else smol.
/// Without any runtime feature this falls back to [`ManualTime`].
#[must_use]
#[cfg(feature = "tokio")]
pub fn default_time_source() -> Arc<dyn TimeSource> {
    Arc::new(self::tokio::TokioTime::new())
}

#[must_use]
#[allow(missing_docs)]
#[cfg(all(feature = "async-std", not(feature = "tokio")))]
pub fn default_time_source() -> Arc<dyn TimeSource> {
    Arc::new(self::async_std::AsyncStdTime::new())
}

#[must_use]
#[allow(missing_docs)]
#[cfg(all(feature = "smol", not(any(feature = "tokio", feature = "async-std"))))]
pub fn default_time_source() -> Arc<dyn TimeSource> {
    Arc::new(self::smol::SmolTime::new())
}

#[must_use]
#[allow(missing_docs)]
#[cfg(not(any(feature = "tokio", feature = "async-std", feature = "smol")))]
pub fn default_time_source() -> Arc<dyn TimeSource> {
    Arc::new(ManualTime::new())
}

#[cfg(feature = "tokio")]
pub mod tokio;

#[cfg(feature = "async-std")]
pub mod async_std;

#[cfg(feature = "smol")]
pub mod smol;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_time() {
        let time = ManualTime::new();
        assert_eq!(time.now(), Duration::ZERO);

        time.advance(Duration::from_secs(10));
        assert_eq!(time.now(), Duration::from_secs(10));

        time.set(Duration::from_secs(100));
        assert_eq!(time.now(), Duration::from_secs(100));
    }

    #[test]
    fn test_manual_time_clone_shares_state() {
        let time1 = ManualTime::with_start_time(Duration::from_secs(1));
        let time2 = time1.clone();

        time1.advance(Duration::from_secs(5));
        assert_eq!(time2.now(), Duration::from_secs(6));
    }

    #[test]
    fn test_manual_sleep_jumps_to_target() {
        let time = ManualTime::new();
        futures::executor::block_on(time.sleep(Duration::from_millis(100)));
        assert_eq!(time.now(), Duration::from_millis(100));

        futures::executor::block_on(time.sleep_until(Duration::from_millis(350)));
        assert_eq!(time.now(), Duration::from_millis(350));
    }

    #[test]
    fn test_sleep_until_past_deadline_is_immediate() {
        let time = ManualTime::with_start_time(Duration::from_secs(2));
        futures::executor::block_on(time.sleep_until(Duration::from_secs(1)));
        assert_eq!(time.now(), Duration::from_secs(2));
    }

    #[test]
    fn test_unpolled_sleep_does_not_advance() {
        let time = ManualTime::new();
        let sleep = time.sleep(Duration::from_secs(3));
        drop(sleep);
        assert_eq!(time.now(), Duration::ZERO);
    }
}
