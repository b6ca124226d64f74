//! Assertion-level links.

use std::future::Future;

use tracing::trace;

use super::{Chain, Expected, Step, Subject};
use crate::deferred::{DeferredAssertion, Promise};
use crate::error::{Error, Result};
use crate::value::Value;

/// Describe a failed deep-equality check.
pub(crate) fn describe_failure(actual: &Value, expected: &Value, negated: bool) -> String {
    let polarity = if negated { "not be" } else { "be" };
    format!("expected {actual} to {polarity} deep equal {expected}")
}

/// A link that can be negated and checked.
///
/// Navigation on an assertion returns an assertion, so `not` and `to_be`
/// stay available after every step.
///
/// # Example
///
/// ```rust
/// use linkwise::prelude::*;
///
/// # fn main() -> linkwise::Result<()> {
/// expect(vec![1, 2, 3]).its(1)?.to_be(2)?;
/// expect("abc").not().to_be("abd")?;
///
/// let err = expect(1_i64).to_be(2).unwrap_err();
/// assert!(err.to_string().contains("expected 1 to be deep equal 2"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Assertion {
    subject: Subject,
    negated: bool,
}

impl Assertion {
    /// Assert on a plain value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            subject: Subject::Held(value.into()),
            negated: false,
        }
    }

    /// What this assertion holds.
    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Returns `true` if the next check is inverted.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The same assertion with the check inverted.
    #[must_use]
    pub fn not(&self) -> Self {
        Self {
            subject: self.subject.clone(),
            negated: !self.negated,
        }
    }

    /// The subject under test.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySubject`] if there is none.
    pub fn unwrap(&self) -> Result<Value> {
        self.subject.take("unwrap called on empty assertion")
    }

    /// Check that the subject is deep equal to `expected` (or, negated, that
    /// it is not).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExpectationFailed`] when the check does not hold,
    /// [`Error::EmptySubject`] when either side is an empty link, and
    /// [`Error::InvalidOperation`] when `expected` is a promise.
    pub fn to_be(&self, expected: impl Into<Expected>) -> Result<()> {
        let actual = self.unwrap()?;
        let expected = expected.into().settle()?;
        let equal = actual.deep_eq(&expected);
        trace!(%actual, %expected, negated = self.negated, equal, "to_be");

        if equal == self.negated {
            return Err(Error::expectation_failed(describe_failure(
                &actual,
                &expected,
                self.negated,
            )));
        }
        Ok(())
    }

    /// Hand the subject to an async function and keep asserting on its
    /// result by polling. Negation carries over.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySubject`] if there is no subject.
    pub fn defer<F, Fut, V>(&self, f: F) -> Result<DeferredAssertion>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = V> + Send + 'static,
        V: Into<Value>,
    {
        let subject = self.unwrap()?;
        let deferred = DeferredAssertion::new(Promise::new(move || f(subject.clone())));
        Ok(if self.negated { deferred.not() } else { deferred })
    }
}

impl Chain for Assertion {
    fn then(&self, step: Step) -> Result<Self> {
        let subject = self
            .subject
            .take("cannot navigate an empty assertion")?;
        Ok(Self {
            subject: Subject::Held(step.run(subject)?),
            negated: self.negated,
        })
    }
}
