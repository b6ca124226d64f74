//! # linkwise
//!
//! > Fluent link chains for navigating a value and asserting on it
//!
//! **linkwise** wraps a subject, walks into it one step at a time, and ends
//! in a deep-equality check. Subjects that settle later are checked by
//! polling until they match or a timeout elapses.
//!
//! ## Quick Start
//!
//! ```rust
//! use linkwise::prelude::*;
//!
//! # fn main() -> linkwise::Result<()> {
//! wrap(4_i64).apply(|x: i64| x * x)?.expect()?.to_be(16)?;
//! wrap(vec![1, 2, 3]).map(|x: i64| x * 2)?.expect()?.to_be(vec![2, 4, 6])?;
//! expect("left").not().to_be("right")?;
//! # Ok(())
//! # }
//! ```
//!
//! Deferred values poll on the configured clock:
//!
//! ```rust,ignore
//! use linkwise::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::test(start_paused = true)]
//! async fn test_settles_late() {
//!     let late = Promise::from_future(async {
//!         tokio::time::sleep(Duration::from_secs(2)).await;
//!         2
//!     });
//!     expect(late).to_be(2).await.unwrap();
//! }
//! ```
//!
//! ## Features
//!
//! - **Three tiers** - [`Container`](chain::Container),
//!   [`Assertion`](chain::Assertion) and
//!   [`DeferredAssertion`](deferred::DeferredAssertion) share one
//!   navigation vocabulary
//! - **Safe traversal** - [`glom`](chain::Chain::glom) yields `Undefined`
//!   instead of failing on missing links
//! - **Polling** - [`Poller`](polling::Poller) over any
//!   [`TimeSource`](runtime::TimeSource)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod chain;
pub mod deferred;
pub mod error;
pub mod polling;
pub mod runtime;
pub mod value;

use chain::IntoSubject;

/// Start a chain over `subject`.
///
/// Plain values give a [`Container`](chain::Container); a
/// [`Promise`](deferred::Promise) gives a
/// [`DeferredAssertion`](deferred::DeferredAssertion).
pub fn wrap<S: IntoSubject>(subject: S) -> S::Link {
    subject.into_link()
}

/// Start a chain at assertion level over `subject`.
///
/// Plain values give an [`Assertion`](chain::Assertion); a
/// [`Promise`](deferred::Promise) gives a
/// [`DeferredAssertion`](deferred::DeferredAssertion).
pub fn expect<S: IntoSubject>(subject: S) -> S::Assertion {
    subject.into_assertion()
}

/// Prelude for convenient imports
///
/// ```rust
/// use linkwise::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chain::{Assertion, Chain, Container, Expected, IntoSubject, NO_ARGS};
    pub use crate::deferred::{DeferredAssertion, Promise};
    pub use crate::error::{Error, Result};
    pub use crate::polling::PollConfig;
    pub use crate::value::{FromValue, Function, Key, Path, Value};
    pub use crate::{expect, wrap};
}

// Re-exports
pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_wrap_picks_container() {
        let link = wrap(4_i64);
        assert!(!link.is_empty());
        assert_eq!(link.unwrap().unwrap(), Value::from(4));
    }

    #[test]
    fn test_expect_equals_empty_expect_at() {
        let direct = expect(vec![1, 2]);
        let via_empty = Container::empty().expect_at(vec![1, 2]).unwrap();
        assert_eq!(direct.unwrap().unwrap(), via_empty.unwrap().unwrap());
    }

    #[test]
    fn test_promise_starts_deferred() {
        let deferred: DeferredAssertion = expect(Promise::ready(1));
        assert!(!deferred.is_negated());
        let _: DeferredAssertion = wrap(Promise::ready(1));
    }
}
