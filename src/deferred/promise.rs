//! Re-evaluable asynchronous values.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::chain::Step;
use crate::error::Result;
use crate::value::Value;

type Produce = dyn Fn() -> BoxFuture<'static, Result<Value>> + Send + Sync;

/// A value that settles later.
///
/// A promise is a recipe: every [`evaluate`](Promise::evaluate) starts a
/// fresh future. Built with [`Promise::new`] the recipe re-runs a closure,
/// so each evaluation reads the latest state. Built with
/// [`Promise::from_future`] every evaluation awaits the same single
/// settlement.
///
/// # Example
///
/// ```rust
/// use linkwise::deferred::Promise;
/// use linkwise::value::Value;
///
/// let promise = Promise::new(|| async { 21 * 2 });
/// let value = futures::executor::block_on(promise.evaluate()).unwrap();
/// assert_eq!(value, Value::from(42));
/// ```
#[derive(Clone)]
pub struct Promise {
    produce: Arc<Produce>,
}

impl Promise {
    /// Re-run `f` on every evaluation.
    pub fn new<F, Fut, V>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = V> + Send + 'static,
        V: Into<Value>,
    {
        Self {
            produce: Arc::new(move || -> BoxFuture<'static, Result<Value>> {
                f().map(|v| Ok(v.into())).boxed()
            }),
        }
    }

    /// Re-run a fallible `f` on every evaluation.
    pub fn fallible<F, Fut, V>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
        V: Into<Value>,
    {
        Self {
            produce: Arc::new(move || -> BoxFuture<'static, Result<Value>> {
                f().map(|r| r.map(Into::into)).boxed()
            }),
        }
    }

    /// Share one future between all evaluations.
    ///
    /// The future is driven by whichever evaluation polls it; once it has
    /// settled every later evaluation sees the same value immediately.
    pub fn from_future<Fut>(fut: Fut) -> Self
    where
        Fut: Future + Send + 'static,
        Fut::Output: Into<Value>,
    {
        let shared = fut.map(Into::<Value>::into).boxed().shared();
        Self {
            produce: Arc::new(move || -> BoxFuture<'static, Result<Value>> {
                shared.clone().map(Ok).boxed()
            }),
        }
    }

    /// A promise that is already settled.
    pub fn ready(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            produce: Arc::new(move || -> BoxFuture<'static, Result<Value>> {
                future::ready(Ok(value.clone())).boxed()
            }),
        }
    }

    /// Start one evaluation.
    #[must_use]
    pub fn evaluate(&self) -> BoxFuture<'static, Result<Value>> {
        (self.produce)()
    }

    /// Chain `step` after every evaluation.
    pub(crate) fn then(&self, step: Step) -> Self {
        let inner = Arc::clone(&self.produce);
        Self {
            produce: Arc::new(move || -> BoxFuture<'static, Result<Value>> {
                let pending = inner();
                let step = step.clone();
                async move { step.run(pending.await?) }.boxed()
            }),
        }
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise").finish_non_exhaustive()
    }
}
