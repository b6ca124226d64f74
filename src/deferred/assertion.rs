//! Assertions over values that settle later.

use std::time::Duration;

use crate::chain::{describe_failure, Chain, Expected, Step};
use crate::error::{Error, Result};
use crate::polling::{PollConfig, Poller};
use crate::value::Value;

use super::Promise;

/// An assertion whose subject is a [`Promise`].
///
/// `to_be` keeps re-evaluating the promise until the check passes or the
/// timeout elapses, so a value that arrives late, or flaps before settling,
/// is accepted on the first passing read.
///
/// # Example
///
/// ```rust,ignore
/// use linkwise::prelude::*;
/// use std::time::Duration;
///
/// let ready = Promise::from_future(async {
///     tokio::time::sleep(Duration::from_secs(2)).await;
///     2
/// });
///
/// expect(ready.clone()).to_be(2).await?;
/// expect(ready).not().to_be(1).await?;
/// ```
#[derive(Clone, Debug)]
pub struct DeferredAssertion {
    promise: Promise,
    negated: bool,
    config: PollConfig,
}

impl DeferredAssertion {
    /// Assert on a promise with the default poll configuration.
    #[must_use]
    pub fn new(promise: Promise) -> Self {
        Self {
            promise,
            negated: false,
            config: PollConfig::default(),
        }
    }

    /// Replace the poll configuration.
    #[must_use]
    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// The same assertion with a different overall timeout.
    #[must_use]
    pub fn within(&self, timeout: Duration) -> Self {
        self.clone().with_config(self.config.clone().timeout(timeout))
    }

    /// The same assertion with a different pause between attempts.
    #[must_use]
    pub fn every(&self, interval: Duration) -> Self {
        self.clone().with_config(self.config.clone().interval(interval))
    }

    /// The poll configuration in use.
    #[must_use]
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// The promise under test, with every navigation step applied.
    #[must_use]
    pub fn promise(&self) -> &Promise {
        &self.promise
    }

    /// Returns `true` if the next check is inverted.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The same assertion with the check inverted. Polling is unchanged.
    #[must_use]
    pub fn not(&self) -> Self {
        Self {
            negated: !self.negated,
            ..self.clone()
        }
    }

    /// Evaluate the subject once.
    ///
    /// # Errors
    ///
    /// Returns whatever evaluating the promise or a navigation step raises.
    pub async fn resolve(&self) -> Result<Value> {
        self.promise.evaluate().await
    }

    /// Poll until the subject is deep equal to `expected` (or, negated,
    /// until it is not).
    ///
    /// A promise on the right-hand side is re-evaluated on every attempt
    /// too.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExpectationFailed`] mentioning the timeout if no
    /// attempt passes in time. An error raised while evaluating either side
    /// stops polling and is returned as is.
    pub async fn to_be(&self, expected: impl Into<Expected>) -> Result<()> {
        let wanted = expected.into().into_producer()?;
        let promise = self.promise.clone();
        let negated = self.negated;

        let settled = Poller::new(self.config.clone())
            .until(
                move || promise.evaluate(),
                wanted,
                move |actual, expected| actual.deep_eq(expected) != negated,
            )
            .await?;

        if settled.passed() {
            return Ok(());
        }
        Err(Error::expectation_failed(format!(
            "{} (timed out after {:?}, {} attempts)",
            describe_failure(&settled.actual, &settled.expected, negated),
            self.config.timeout,
            settled.attempts
        )))
    }
}

impl Chain for DeferredAssertion {
    fn then(&self, step: Step) -> Result<Self> {
        Ok(Self {
            promise: self.promise.then(step),
            ..self.clone()
        })
    }
}
