//! The poll loop.

use std::pin::pin;
use std::time::Duration;

use futures::future::{self, BoxFuture, Either};
use tracing::{debug, trace};

use super::{PollConfig, MIN_INTERVAL};
use crate::error::Result;
use crate::value::Value;

/// Where a poll loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Still attempting.
    Polling,
    /// An attempt passed.
    Passed,
    /// The deadline elapsed first.
    TimedOut,
}

/// How a poll loop ended.
#[derive(Debug, Clone)]
pub struct Settled {
    /// [`PollState::Passed`] or [`PollState::TimedOut`].
    pub state: PollState,
    /// Number of attempts started, including one cut off by the deadline.
    pub attempts: usize,
    /// The last actual value observed; `Undefined` if none settled.
    pub actual: Value,
    /// The last expected value observed; `Undefined` if none settled.
    pub expected: Value,
    /// Time from the first attempt to the end of the loop.
    pub elapsed: Duration,
}

impl Settled {
    /// Returns `true` if the loop ended on a passing attempt.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.state == PollState::Passed
    }
}

/// Repeatedly evaluates an actual/expected pair until a predicate holds.
#[derive(Debug, Clone, Default)]
pub struct Poller {
    config: PollConfig,
}

impl Poller {
    /// Create a poller with the given configuration.
    #[must_use]
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Poll until `passes(actual, expected)` holds or the timeout elapses.
    ///
    /// Every attempt calls both producers afresh, expected first, and is
    /// raced against the overall deadline. Between failed attempts the loop
    /// sleeps for the configured interval (at least [`MIN_INTERVAL`]), cut
    /// short at the deadline. The first attempt always runs.
    ///
    /// # Errors
    ///
    /// An error from either producer ends the loop at once and is returned
    /// unchanged. A timeout is not an error; it is reported through
    /// [`Settled::state`].
    pub async fn until<A, E, P>(&self, mut actual: A, mut expected: E, passes: P) -> Result<Settled>
    where
        A: FnMut() -> BoxFuture<'static, Result<Value>>,
        E: FnMut() -> BoxFuture<'static, Result<Value>>,
        P: Fn(&Value, &Value) -> bool,
    {
        let time = self.config.clock();
        let start = time.now();
        let deadline = start + self.config.timeout;

        let mut state = PollState::Polling;
        let mut attempts = 0;
        let mut last = (Value::Undefined, Value::Undefined);

        while state == PollState::Polling {
            attempts += 1;
            trace!(attempt = attempts, elapsed = ?time.now().saturating_sub(start), "poll attempt");

            // The expected side settles first and is kept even if the
            // deadline then cuts off the actual side.
            let finished = {
                let wanted_slot = &mut last.1;
                let evaluation = pin!(async {
                    let wanted = expected().await?;
                    *wanted_slot = wanted.clone();
                    let observed = actual().await?;
                    Ok::<_, crate::Error>((observed, wanted))
                });
                let raced = future::select(evaluation, time.sleep_until(deadline)).await;
                match raced {
                    Either::Left((outcome, _)) => Some(outcome),
                    Either::Right(((), _)) => None,
                }
            };

            let Some(outcome) = finished else {
                trace!(attempt = attempts, "poll attempt cut off by deadline");
                state = PollState::TimedOut;
                continue;
            };

            let (observed, wanted) = outcome?;
            let passed = passes(&observed, &wanted);
            last = (observed, wanted);
            if passed {
                state = PollState::Passed;
                continue;
            }

            let now = time.now();
            if now >= deadline {
                state = PollState::TimedOut;
            } else {
                let pause = self.config.interval.max(MIN_INTERVAL);
                time.sleep(pause.min(deadline - now)).await;
            }
        }

        let elapsed = time.now().saturating_sub(start);
        match state {
            PollState::Passed => debug!(attempts, ?elapsed, "poll passed"),
            _ => debug!(attempts, ?elapsed, actual = %last.0, expected = %last.1, "poll timed out"),
        }

        Ok(Settled {
            state,
            attempts,
            actual: last.0,
            expected: last.1,
            elapsed,
        })
    }
}
