//! The base link.

use std::future::Future;

use super::{Assertion, Chain, Expected, Step, Subject};
use crate::deferred::{DeferredAssertion, Promise};
use crate::error::{Error, Result};
use crate::value::{Key, Value};

/// Holds one subject, or nothing, and navigates into it.
///
/// Every navigation step returns a new container; none modify the
/// original.
///
/// # Example
///
/// ```rust
/// use linkwise::prelude::*;
///
/// # fn main() -> linkwise::Result<()> {
/// let squared = Container::wrap(4).apply(|x: i64| x * x)?;
/// assert_eq!(squared.unwrap()?, Value::from(16));
///
/// assert!(Container::empty().unwrap().is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Container {
    subject: Subject,
}

impl Container {
    /// Wrap a plain value.
    ///
    /// Use [`wrap`](crate::wrap) to have promises start deferred.
    pub fn wrap(value: impl Into<Value>) -> Self {
        Self {
            subject: Subject::Held(value.into()),
        }
    }

    /// A container with no subject.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            subject: Subject::Empty,
        }
    }

    /// Returns `true` if nothing is wrapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty()
    }

    /// What this container holds.
    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// The wrapped value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySubject`] if nothing is wrapped.
    pub fn unwrap(&self) -> Result<Value> {
        self.subject.take("unwrap called on empty container")
    }

    /// Move to assertion level over the current subject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySubject`] if nothing is wrapped.
    pub fn expect(&self) -> Result<Assertion> {
        match &self.subject {
            Subject::Empty => Err(Error::empty_subject(
                "expect called without arguments on empty container",
            )),
            Subject::Held(value) => Ok(Assertion::new(value.clone())),
        }
    }

    /// Move to assertion level with an argument.
    ///
    /// On an empty container the argument itself becomes the subject under
    /// test. Otherwise the argument is a key, and the assertion is over
    /// `subject[arg]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] if the argument is not usable as
    /// a key, or if the subject cannot be indexed.
    pub fn expect_at(&self, arg: impl Into<Value>) -> Result<Assertion> {
        let arg = arg.into();
        if self.is_empty() {
            return Ok(Assertion::new(arg));
        }
        let key = Key::try_from(arg)?;
        Ok(Assertion::new(self.its(key)?.unwrap()?))
    }

    /// Shorthand for `expect()?.to_be(expected)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExpectationFailed`] if the subject is not deep equal
    /// to `expected`, or [`Error::EmptySubject`] if nothing is wrapped.
    pub fn to_be(&self, expected: impl Into<Expected>) -> Result<()> {
        self.expect()?.to_be(expected)
    }

    /// Hand the subject to an async function and assert on its result by
    /// polling.
    ///
    /// `f` re-runs on every poll attempt with a copy of the current subject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySubject`] if nothing is wrapped.
    pub fn defer<F, Fut, V>(&self, f: F) -> Result<DeferredAssertion>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = V> + Send + 'static,
        V: Into<Value>,
    {
        let subject = self.unwrap()?;
        Ok(DeferredAssertion::new(Promise::new(move || f(subject.clone()))))
    }
}

impl Chain for Container {
    fn then(&self, step: Step) -> Result<Self> {
        let subject = self
            .subject
            .take("cannot navigate an empty container")?;
        Ok(Self::wrap(step.run(subject)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::NO_ARGS;
    use crate::value::Function;
    use serde_json::json;

    fn account() -> Value {
        Value::object([
            ("owner", Value::from("ada")),
            ("balance", Value::from(120)),
            (
                "deposit",
                Value::function(|this: &Value, args: &[Value]| {
                    let balance = this.index(&Key::from("balance")).as_f64().unwrap_or(0.0);
                    let amount = args.first().and_then(Value::as_f64).unwrap_or(0.0);
                    balance + amount
                }),
            ),
        ])
    }

    #[test]
    fn test_wrap_unwrap_identity() {
        for value in [
            Value::Null,
            Value::Undefined,
            Value::from(0),
            Value::from("text"),
            Value::from(json!({"a": [1, {"b": true}]})),
        ] {
            assert_eq!(Container::wrap(value.clone()).unwrap().unwrap(), value);
        }
    }

    #[test]
    fn test_empty_unwrap_fails() {
        let err = Container::empty().unwrap().unwrap_err();
        assert!(err.is_empty_subject());
    }

    #[test]
    fn test_apply_matches_direct_call() {
        let f = |x: i64| x * 3 + 1;
        let applied = Container::wrap(5).apply(f).unwrap();
        assert_eq!(applied.unwrap().unwrap(), Value::from(f(5)));
    }

    #[test]
    fn test_apply_does_not_touch_original() {
        let original = Container::wrap(2);
        let _ = original.apply(|x: i64| x + 1).unwrap();
        assert_eq!(original.unwrap().unwrap(), Value::from(2));
    }

    #[test]
    fn test_apply_conversion_failure() {
        let err = Container::wrap("two").apply(|x: i64| x).unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn test_try_apply_propagates_error() {
        let err = Container::wrap(1)
            .try_apply(|_: Value| -> Result<Value> { Err(Error::raised("nope")) })
            .unwrap_err();
        assert_eq!(err, Error::raised("nope"));
    }

    #[test]
    fn test_its() {
        let owner = Container::wrap(account()).its("owner").unwrap();
        assert_eq!(owner.unwrap().unwrap(), Value::from("ada"));

        let missing = Container::wrap(account()).its("nickname").unwrap();
        assert_eq!(missing.unwrap().unwrap(), Value::Undefined);
    }

    #[test]
    fn test_its_on_empty_and_null() {
        assert!(Container::empty().its("a").unwrap_err().is_empty_subject());
        assert!(Container::wrap(Value::Null)
            .its("a")
            .unwrap_err()
            .is_invalid_operation());
    }

    #[test]
    fn test_glom_never_fails_on_missing() {
        let root = Container::wrap(json!({"a": {"b": {"c": 7}}}));
        assert_eq!(
            root.glom(["a", "b", "c"]).unwrap().unwrap().unwrap(),
            Value::from(7)
        );
        assert_eq!(
            root.glom(["a", "x", "c"]).unwrap().unwrap().unwrap(),
            Value::Undefined
        );
        assert!(Container::empty().glom(["a"]).unwrap_err().is_empty_subject());
    }

    #[test]
    fn test_invokes_binds_this() {
        let after = Container::wrap(account()).invokes("deposit", [30]).unwrap();
        assert_eq!(after.unwrap().unwrap(), Value::from(150));
    }

    #[test]
    fn test_invokes_without_args() {
        let counter = Value::object([("count", Function::new(|_, args: &[Value]| args.len()))]);
        let out = Container::wrap(counter).invokes("count", NO_ARGS).unwrap();
        assert_eq!(out.unwrap().unwrap(), Value::from(0));
    }

    #[test]
    fn test_invokes_non_callable() {
        let err = Container::wrap(account())
            .invokes("balance", NO_ARGS)
            .unwrap_err();
        assert!(err.is_invalid_operation());
        assert!(err.to_string().contains("`balance` is number"));
    }

    #[test]
    fn test_invokes_propagates_function_error() {
        let failing = Value::object([(
            "explode",
            Function::fallible(|_, _| Err(Error::raised("kaboom"))),
        )]);
        let err = Container::wrap(failing)
            .invokes("explode", NO_ARGS)
            .unwrap_err();
        assert_eq!(err, Error::raised("kaboom"));
    }

    #[test]
    fn test_map_and_each() {
        let doubled = Container::wrap(vec![1, 2, 3]).map(|x: i64| x * 2).unwrap();
        assert_eq!(doubled.unwrap().unwrap(), Value::from(vec![2, 4, 6]));

        let labelled = Container::wrap(vec![1, 2])
            .each(|x: i64| format!("#{x}"))
            .unwrap();
        assert_eq!(labelled.unwrap().unwrap(), Value::from(vec!["#1", "#2"]));
    }

    #[test]
    fn test_map_requires_sequence() {
        let err = Container::wrap(json!({"a": 1}))
            .map(|x: Value| x)
            .unwrap_err();
        assert!(err.is_invalid_operation());
        assert!(err.to_string().contains("map requires an ordered sequence"));
    }

    #[test]
    fn test_filter_preserves_order() {
        let kept = Container::wrap(vec![5, 1, 4, 2, 3])
            .filter(|x: i64| x >= 3)
            .unwrap();
        assert_eq!(kept.unwrap().unwrap(), Value::from(vec![5, 4, 3]));

        let err = Container::wrap("abc").filter(|_: Value| true).unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn test_expect_on_empty() {
        let err = Container::empty().expect().unwrap_err();
        assert_eq!(
            err,
            Error::empty_subject("expect called without arguments on empty container")
        );

        let assertion = Container::empty().expect_at(json!([1, 2])).unwrap();
        assert_eq!(assertion.unwrap().unwrap(), Value::from(vec![1, 2]));
    }

    #[test]
    fn test_expect_at_navigates() {
        let assertion = Container::wrap(account()).expect_at("owner").unwrap();
        assert!(assertion.to_be("ada").is_ok());

        let err = Container::wrap(account()).expect_at(true).unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn test_container_to_be() {
        assert!(Container::wrap(3).to_be(3).is_ok());
        assert!(Container::wrap(3).to_be(4).unwrap_err().is_expectation_failed());
        assert!(Container::empty().to_be(4).unwrap_err().is_empty_subject());
    }

    #[test]
    fn test_defer_on_empty() {
        let err = Container::empty()
            .defer(|v| async move { v })
            .unwrap_err();
        assert!(err.is_empty_subject());
    }
}
