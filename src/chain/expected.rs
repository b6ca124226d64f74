//! The right-hand side of `to_be`.

use futures::future::{self, BoxFuture, FutureExt};

use super::{Assertion, Container, IntoSubject, Subject};
use crate::deferred::{DeferredAssertion, Promise};
use crate::error::{Error, Result};
use crate::value::Value;

/// What a subject is compared against.
///
/// Anything that can start a chain converts into an `Expected`, and so do
/// references to existing links, whose subject is unwrapped at comparison
/// time.
#[derive(Clone, Debug)]
pub enum Expected {
    /// A plain value.
    Value(Value),
    /// The subject of another link, possibly empty.
    Subject(Subject),
    /// A value that settles later; only deferred assertions accept it.
    Deferred(Promise),
}

pub(crate) type Producer = Box<dyn FnMut() -> BoxFuture<'static, Result<Value>> + Send>;

impl Expected {
    /// Resolve for an immediate comparison.
    pub(crate) fn settle(self) -> Result<Value> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Subject(subject) => subject.take("expected value is an empty link"),
            Self::Deferred(_) => Err(Error::invalid_operation(
                "a promise can only be expected by a deferred assertion",
            )),
        }
    }

    /// Resolve into a producer evaluated on every poll attempt.
    pub(crate) fn into_producer(self) -> Result<Producer> {
        match self {
            Self::Deferred(promise) => Ok(Box::new(move || promise.evaluate())),
            settled => {
                let value = settled.settle()?;
                Ok(Box::new(move || -> BoxFuture<'static, Result<Value>> {
                    future::ready(Ok(value.clone())).boxed()
                }))
            }
        }
    }
}

impl<T: IntoSubject> From<T> for Expected {
    fn from(subject: T) -> Self {
        subject.into_expected()
    }
}

impl From<&Container> for Expected {
    fn from(container: &Container) -> Self {
        Self::Subject(container.subject().clone())
    }
}

impl From<&Assertion> for Expected {
    fn from(assertion: &Assertion) -> Self {
        Self::Subject(assertion.subject().clone())
    }
}

impl From<&DeferredAssertion> for Expected {
    fn from(assertion: &DeferredAssertion) -> Self {
        Self::Deferred(assertion.promise().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_settle() {
        assert_eq!(Expected::from(3).settle().unwrap(), Value::from(3));
        assert_eq!(
            Expected::from(vec!["a"]).settle().unwrap(),
            Value::from(vec!["a"])
        );
    }

    #[test]
    fn test_links_unwrap_at_settle() {
        let container = Container::wrap("x");
        assert_eq!(Expected::from(&container).settle().unwrap(), Value::from("x"));

        let err = Expected::from(&Container::empty()).settle().unwrap_err();
        assert!(err.is_empty_subject());
    }

    #[test]
    fn test_promise_does_not_settle_immediately() {
        let err = Expected::from(Promise::ready(1)).settle().unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn test_producers() {
        let mut fixed = Expected::from(5).into_producer().unwrap();
        assert_eq!(futures::executor::block_on(fixed()).unwrap(), Value::from(5));
        assert_eq!(futures::executor::block_on(fixed()).unwrap(), Value::from(5));

        let mut later = Expected::from(Promise::ready("soon")).into_producer().unwrap();
        assert_eq!(futures::executor::block_on(later()).unwrap(), Value::from("soon"));
    }
}
