//! Tokio time for the polling engine.
//!
//! Uses `tokio::time`, so a runtime started with paused time (for example
//! `#[tokio::test(start_paused = true)]`) auto-advances through poll
//! intervals instead of waiting for them.
//!
//! # Example
//!
//! ```rust,ignore
//! use linkwise::runtime::tokio::TokioTime;
//! use linkwise::polling::PollConfig;
//! use std::sync::Arc;
//!
//! let config = PollConfig::new().time_source(Arc::new(TokioTime::new()));
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;
use std::time::Duration;

use ::tokio::time::Instant;

use super::TimeSource;

/// Tokio-based time source.
///
/// The epoch is fixed on the first call to [`TimeSource::now`], which
/// happens inside the runtime that drives the poll loop.
#[derive(Debug, Clone, Default)]
pub struct TokioTime {
    epoch: OnceLock<Instant>,
}

impl TokioTime {
    /// Create a new Tokio time source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimeSource for TokioTime {
    fn now(&self) -> Duration {
        self.epoch.get_or_init(Instant::now).elapsed()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(::tokio::time::sleep(duration))
    }
}
