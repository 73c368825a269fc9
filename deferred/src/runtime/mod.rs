//! The entry point for creating deferreds and combining promises.
//!
//! A [`Runtime`] binds the promise machinery to one scheduler, the way a
//! promise library is instantiated with its `nextTick` primitive. Every
//! deferred and promise it creates schedules its continuations there.
//!
//! It provides:
//! - [`Runtime::defer`] for new deferred/promise pairs,
//! - [`Runtime::coerce`], [`Runtime::resolved`] and [`Runtime::reject`] for
//!   already settled promises,
//! - [`Runtime::when`] for adapting arbitrary values,
//! - [`Runtime::all`] for aggregating many promises into one.

mod all;
mod when;

pub use all::Aggregate;

use crate::promise::{Deferred, IntoResolution, Promise, Resolution};
use crate::scheduler::{Schedule, Scheduler};

use std::rc::Rc;

/// Creates and combines promises scheduled on a single [`Schedule`].
///
/// The handle is cheap to clone; clones share the scheduler.
///
/// # Examples
///
/// ```rust
/// use deferred::{Deferred, EventLoop};
///
/// let event_loop = EventLoop::new();
/// let runtime = event_loop.runtime();
///
/// let deferred: Deferred<&str, String> = runtime.defer();
/// let greeting = deferred.promise().then(|name| Ok(format!("hello, {name}")));
///
/// deferred.resolve(Ok("world"));
/// event_loop.run().unwrap();
/// # let _ = greeting;
/// ```
#[derive(Clone)]
pub struct Runtime {
    /// Scheduler every promise of this runtime runs its continuations on.
    scheduler: Scheduler,
}

impl Runtime {
    /// Creates a runtime scheduling onto `scheduler`.
    pub fn new<S>(scheduler: S) -> Self
    where
        S: Schedule + 'static,
    {
        Self {
            scheduler: Rc::new(scheduler),
        }
    }

    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Creates a new pending deferred and its promise.
    pub fn defer<T, E, P>(&self) -> Deferred<T, E, P>
    where
        T: Clone + 'static,
        E: Clone + 'static,
        P: Clone + 'static,
    {
        Deferred::new(self.scheduler.clone())
    }

    /// Coerces `value` into a promise.
    ///
    /// A [`Promise`] is returned unchanged, so coercion is idempotent.
    /// Anything else becomes a new promise that is already settled to the
    /// value's [`Resolution`]; its handlers still run on a later turn.
    pub fn coerce<T, E, P>(&self, value: impl IntoResolution<T, E, P>) -> Promise<T, E, P>
    where
        T: Clone + 'static,
        E: Clone + 'static,
        P: Clone + 'static,
    {
        value.into_promise(self)
    }

    /// A promise fulfilled with a plain `value`.
    pub fn resolved<T, E, P>(&self, value: T) -> Promise<T, E, P>
    where
        T: Clone + 'static,
        E: Clone + 'static,
        P: Clone + 'static,
    {
        self.coerce(Resolution::Fulfilled(value))
    }

    /// A promise permanently rejected with `reason`.
    ///
    /// Success handlers chained on it never run; failure handlers run on a
    /// later turn, and a missing one re-rejects with the same reason.
    pub fn reject<T, E, P>(&self, reason: E) -> Promise<T, E, P>
    where
        T: Clone + 'static,
        E: Clone + 'static,
        P: Clone + 'static,
    {
        self.coerce(Resolution::Rejected(reason))
    }
}
