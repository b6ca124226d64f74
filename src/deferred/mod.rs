//! Assertions that wait for their subject.
//!
//! A [`Promise`] is a value that settles later. Wrapping one yields a
//! [`DeferredAssertion`], whose `to_be` polls through
//! [`Poller`](crate::polling::Poller) until the check passes or the
//! configured timeout elapses. Navigation steps are recorded on the promise
//! and replayed on every evaluation.

mod assertion;
mod promise;

pub use assertion::DeferredAssertion;
pub use promise::Promise;
