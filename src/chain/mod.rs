//! Fluent link chains.
//!
//! A chain wraps a subject, navigates into it step by step, and ends in an
//! assertion. Three tiers of link share one navigation vocabulary through
//! the [`Chain`] trait, and every step returns the tier it was called on:
//!
//! - [`Container`] - holds a subject (or nothing) and navigates
//! - [`Assertion`] - a container that can be negated and checked with `to_be`
//! - [`DeferredAssertion`](crate::deferred::DeferredAssertion) - an assertion
//!   over a [`Promise`](crate::deferred::Promise), checked by polling
//!
//! Which tier a subject starts in is decided by [`IntoSubject`]: plain
//! values start as a container, promises start deferred.
//!
//! # Example
//!
//! ```rust
//! use linkwise::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> linkwise::Result<()> {
//! wrap(json!({"a": {"b": 3}}))
//!     .glom(["a", "b"])?
//!     .apply(|x: i64| x * x)?
//!     .to_be(9)?;
//!
//! wrap(vec![1, 2, 3])
//!     .filter(|x: i64| x > 2)?
//!     .expect()?
//!     .its(0)?
//!     .to_be(3)?;
//! # Ok(())
//! # }
//! ```

mod assertion;
mod container;
mod expected;

pub use assertion::Assertion;
pub use container::Container;
pub use expected::Expected;

pub(crate) use assertion::describe_failure;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::deferred::{DeferredAssertion, Promise};
use crate::error::{Error, Result};
use crate::value::{FromValue, Function, Key, Path, Value};

/// No arguments, for [`Chain::invokes`].
pub const NO_ARGS: [Value; 0] = [];

/// What a link holds.
#[derive(Clone, Debug, Default)]
pub enum Subject {
    /// Nothing has been wrapped yet.
    #[default]
    Empty,
    /// A wrapped value.
    Held(Value),
}

impl Subject {
    /// Returns `true` for the empty sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The held value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Empty => None,
            Self::Held(value) => Some(value),
        }
    }

    pub(crate) fn take(&self, context: &str) -> Result<Value> {
        self.value()
            .cloned()
            .ok_or_else(|| Error::empty_subject(context.to_string()))
    }
}

/// One navigation step: subject in, next subject out.
#[derive(Clone)]
pub struct Step(Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>);

impl Step {
    /// Wrap a step function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the step.
    ///
    /// # Errors
    ///
    /// Returns whatever the step raises.
    pub fn run(&self, subject: Value) -> Result<Value> {
        (self.0)(subject)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Step")
    }
}

fn sequence(subject: Value, operation: &str) -> Result<Vec<Value>> {
    match subject {
        Value::Array(items) => Ok(items),
        other => Err(Error::invalid_operation(format!(
            "{operation} requires an ordered sequence, found {} {other}",
            other.type_name()
        ))),
    }
}

/// Navigation shared by every tier of link.
///
/// Implementors supply [`then`](Chain::then); every other method is built on
/// it and returns `Self`, so a chain never drops to a lower tier mid-way.
/// Closures must be `Fn + Send + Sync + 'static` because a deferred link
/// re-runs them on every poll attempt.
pub trait Chain: Sized {
    /// Feed the subject through `step` and wrap the result in a new link of
    /// the same tier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySubject`] if there is no subject, or the step's
    /// own error.
    fn then(&self, step: Step) -> Result<Self>;

    /// Apply `f` to the subject.
    ///
    /// The subject is converted to `T` first; see [`FromValue`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] if the subject does not convert.
    fn apply<T, V, F>(&self, f: F) -> Result<Self>
    where
        T: FromValue,
        V: Into<Value>,
        F: Fn(T) -> V + Send + Sync + 'static,
    {
        self.then(Step::new(move |subject| Ok(f(T::from_value(subject)?).into())))
    }

    /// Apply a fallible `f` to the subject; its error propagates unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error `f` raises.
    fn try_apply<T, V, F>(&self, f: F) -> Result<Self>
    where
        T: FromValue,
        V: Into<Value>,
        F: Fn(T) -> Result<V> + Send + Sync + 'static,
    {
        self.then(Step::new(move |subject| f(T::from_value(subject)?).map(Into::into)))
    }

    /// Read `subject[key]`; a missing key yields `Undefined`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] if the subject is null or
    /// undefined.
    fn its(&self, key: impl Into<Key>) -> Result<Self> {
        let key = key.into();
        self.then(Step::new(move |subject| subject.get(&key)))
    }

    /// Walk `keys` into the subject; a missing link anywhere yields
    /// `Undefined`.
    ///
    /// # Errors
    ///
    /// Only fails if there is no subject.
    fn glom<I>(&self, keys: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let path: Path = keys.into_iter().collect();
        self.then(Step::new(move |subject| Ok(path.traverse(&subject))))
    }

    /// Call the function at `subject[key]` with `this` bound to the subject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] if the property is not a
    /// function, or the function's own error.
    fn invokes<I>(&self, key: impl Into<Key>, args: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let key = key.into();
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        self.then(Step::new(move |subject| match subject.get(&key)? {
            Value::Function(method) => method.call(&subject, &args),
            other => Err(Error::invalid_operation(format!(
                "property `{key}` is {}, not a function",
                other.type_name()
            ))),
        }))
    }

    /// Apply `f` to every element of a sequence subject.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] if the subject is not an array or
    /// an element does not convert to `T`.
    fn map<T, V, F>(&self, f: F) -> Result<Self>
    where
        T: FromValue,
        V: Into<Value>,
        F: Fn(T) -> V + Send + Sync + 'static,
    {
        self.then(Step::new(move |subject| {
            sequence(subject, "map")?
                .into_iter()
                .map(|item| Ok(f(T::from_value(item)?).into()))
                .collect::<Result<Vec<Value>>>()
                .map(Value::Array)
        }))
    }

    /// Alias of [`map`](Chain::map).
    ///
    /// # Errors
    ///
    /// As for [`map`](Chain::map).
    fn each<T, V, F>(&self, f: F) -> Result<Self>
    where
        T: FromValue,
        V: Into<Value>,
        F: Fn(T) -> V + Send + Sync + 'static,
    {
        self.map(f)
    }

    /// Keep the elements of a sequence subject for which `predicate` holds,
    /// in their original order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] if the subject is not an array or
    /// an element does not convert to `T`.
    fn filter<T, F>(&self, predicate: F) -> Result<Self>
    where
        T: FromValue,
        F: Fn(T) -> bool + Send + Sync + 'static,
    {
        self.then(Step::new(move |subject| {
            let mut kept = Vec::new();
            for item in sequence(subject, "filter")? {
                if predicate(T::from_value(item.clone())?) {
                    kept.push(item);
                }
            }
            Ok(Value::Array(kept))
        }))
    }
}

/// Picks the tier a subject starts in.
///
/// Plain values start as a [`Container`] (or an [`Assertion`] through
/// [`expect`](crate::expect)); a [`Promise`] starts as a
/// [`DeferredAssertion`] in both cases.
pub trait IntoSubject {
    /// What [`wrap`](crate::wrap) returns.
    type Link: Chain;
    /// What [`expect`](crate::expect) returns.
    type Assertion: Chain;

    /// Start a chain.
    fn into_link(self) -> Self::Link;

    /// Start a chain at assertion level.
    fn into_assertion(self) -> Self::Assertion;

    /// Use as the right-hand side of `to_be`.
    fn into_expected(self) -> Expected;
}

macro_rules! plain_subject {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoSubject for $t {
                type Link = Container;
                type Assertion = Assertion;

                fn into_link(self) -> Container {
                    Container::wrap(self)
                }

                fn into_assertion(self) -> Assertion {
                    Assertion::new(self)
                }

                fn into_expected(self) -> Expected {
                    Expected::Value(self.into())
                }
            }
        )*
    };
}

plain_subject!(
    Value,
    serde_json::Value,
    Function,
    BTreeMap<String, Value>,
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &str,
    (),
);

impl<T: Into<Value>> IntoSubject for Vec<T> {
    type Link = Container;
    type Assertion = Assertion;

    fn into_link(self) -> Container {
        Container::wrap(self)
    }

    fn into_assertion(self) -> Assertion {
        Assertion::new(self)
    }

    fn into_expected(self) -> Expected {
        Expected::Value(self.into())
    }
}

impl<T: Into<Value>> IntoSubject for Option<T> {
    type Link = Container;
    type Assertion = Assertion;

    fn into_link(self) -> Container {
        Container::wrap(self)
    }

    fn into_assertion(self) -> Assertion {
        Assertion::new(self)
    }

    fn into_expected(self) -> Expected {
        Expected::Value(self.into())
    }
}

impl IntoSubject for Promise {
    type Link = DeferredAssertion;
    type Assertion = DeferredAssertion;

    fn into_link(self) -> DeferredAssertion {
        DeferredAssertion::new(self)
    }

    fn into_assertion(self) -> DeferredAssertion {
        DeferredAssertion::new(self)
    }

    fn into_expected(self) -> Expected {
        Expected::Deferred(self)
    }
}
