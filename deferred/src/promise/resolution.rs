use super::{Observer, Promise};
use crate::runtime::Runtime;
use crate::scheduler::Scheduler;

use std::rc::Rc;

/// Anything that can deliver an eventual outcome to an [`Observer`].
///
/// [`Promise`] implements it; so can promise-likes from outside this crate.
/// A well-behaved thenable delivers at most one of success or failure,
/// never synchronously, and progress only before that. Combinators that
/// accept arbitrary thenables ([`Runtime::when`]) tolerate ones that don't.
pub trait Thenable<T, E, P = ()> {
    /// Registers `observer` for the eventual outcome.
    fn then_observe(&self, observer: Observer<T, E, P>);

    /// This thenable as one of the crate's own promises, if it is one.
    ///
    /// Deferreds follow it to refuse adoption chains that loop back on
    /// themselves. Foreign implementations keep the default.
    fn as_promise(&self) -> Option<&Promise<T, E, P>> {
        None
    }
}

/// What a deferred settles to.
///
/// Success and failure handlers return anything convertible into a
/// `Resolution` (see [`IntoResolution`]); the derived promise settles to it.
pub enum Resolution<T, E, P = ()> {
    /// Settled successfully with a value.
    Fulfilled(T),

    /// Settled with a rejection reason.
    Rejected(E),

    /// Settles however the inner thenable does, at whatever depth.
    Pending(Rc<dyn Thenable<T, E, P>>),
}

impl<T, E, P> Resolution<T, E, P>
where
    T: 'static,
    E: 'static,
    P: 'static,
{
    /// Hands `observer` the outcome: on a later turn for a settled value or
    /// reason, or by forwarding to the inner thenable.
    pub(crate) fn attach(self, observer: Observer<T, E, P>, scheduler: &Scheduler) {
        match self {
            Self::Fulfilled(value) => {
                scheduler.schedule(Box::new(move || observer.fulfill(value)));
            }
            Self::Rejected(reason) => {
                scheduler.schedule(Box::new(move || observer.reject(reason)));
            }
            Self::Pending(thenable) => thenable.then_observe(observer),
        }
    }
}

impl<T: Clone, E: Clone, P> Clone for Resolution<T, E, P> {
    fn clone(&self) -> Self {
        match self {
            Self::Fulfilled(value) => Self::Fulfilled(value.clone()),
            Self::Rejected(reason) => Self::Rejected(reason.clone()),
            Self::Pending(thenable) => Self::Pending(thenable.clone()),
        }
    }
}

impl<T, E, P> From<Promise<T, E, P>> for Resolution<T, E, P>
where
    T: Clone + 'static,
    E: Clone + 'static,
    P: Clone + 'static,
{
    fn from(promise: Promise<T, E, P>) -> Self {
        Self::Pending(Rc::new(promise))
    }
}

/// Conversion into a [`Resolution`], i.e. value coercion.
///
/// `Ok`/`Err` become a fulfilled/rejected resolution, promises and thenables
/// are adopted. [`into_promise`](Self::into_promise) is the coercion used by
/// [`Runtime::coerce`]: promises come back unchanged, everything else is
/// wrapped in a new, already settled promise.
pub trait IntoResolution<T, E, P = ()> {
    /// Converts `self` into the resolution a deferred settles to.
    fn into_resolution(self) -> Resolution<T, E, P>;

    /// Coerces `self` into a promise scheduled by `runtime`.
    fn into_promise(self, runtime: &Runtime) -> Promise<T, E, P>
    where
        Self: Sized,
        T: Clone + 'static,
        E: Clone + 'static,
        P: Clone + 'static,
    {
        Promise::from_resolution(self.into_resolution(), runtime.scheduler().clone())
    }
}

impl<T, E, P> IntoResolution<T, E, P> for Resolution<T, E, P> {
    fn into_resolution(self) -> Resolution<T, E, P> {
        self
    }
}

impl<T, E, P> IntoResolution<T, E, P> for Result<T, E> {
    fn into_resolution(self) -> Resolution<T, E, P> {
        match self {
            Ok(value) => Resolution::Fulfilled(value),
            Err(reason) => Resolution::Rejected(reason),
        }
    }
}

impl<T, E, P> IntoResolution<T, E, P> for Rc<dyn Thenable<T, E, P>> {
    fn into_resolution(self) -> Resolution<T, E, P> {
        Resolution::Pending(self)
    }
}

impl<T, E, P> IntoResolution<T, E, P> for Promise<T, E, P>
where
    T: Clone + 'static,
    E: Clone + 'static,
    P: Clone + 'static,
{
    fn into_resolution(self) -> Resolution<T, E, P> {
        Resolution::from(self)
    }

    fn into_promise(self, _runtime: &Runtime) -> Promise<T, E, P> {
        self
    }
}
