use super::state::State;
use super::{IntoResolution, Observer, Promise, Resolution, Thenable};
use crate::scheduler::Scheduler;

use std::mem;
use std::rc::Rc;

use tracing::{trace, warn};

/// The write side of an eventual value.
///
/// A `Deferred` settles its [`Promise`] exactly once. The first call to
/// [`resolve`](Self::resolve) or [`reject`](Self::reject) wins; later calls,
/// from this handle or any clone of it, are silently ignored.
///
/// Created by [`Runtime::defer`](crate::Runtime::defer).
pub struct Deferred<T, E, P = ()> {
    promise: Promise<T, E, P>,
}

impl<T, E, P> Clone for Deferred<T, E, P> {
    fn clone(&self) -> Self {
        Self {
            promise: self.promise.clone(),
        }
    }
}

impl<T, E, P> Deferred<T, E, P>
where
    T: Clone + 'static,
    E: Clone + 'static,
    P: Clone + 'static,
{
    pub(crate) fn new(scheduler: Scheduler) -> Self {
        Self {
            promise: Promise::pending(scheduler),
        }
    }

    /// Returns the read-only view of this deferred.
    pub fn promise(&self) -> Promise<T, E, P> {
        self.promise.clone()
    }

    /// Returns `true` once `resolve` or `reject` has been called.
    ///
    /// A deferred resolved with a pending promise is settled: it no longer
    /// accepts a value, even though its outcome is not known yet.
    pub fn is_settled(&self) -> bool {
        matches!(*self.promise.shared.state.borrow(), State::Settled(_))
    }

    /// Settles the deferred with `value`.
    ///
    /// `value` is coerced: `Ok`/`Err` fulfil/reject, a promise or thenable is
    /// adopted and the outcome follows it. Observers registered so far are
    /// attached to the outcome on the next turn, in registration order.
    ///
    /// Adopting a chain of promises that leads back to this one would wait
    /// forever: the deferred still settles, but its observers are dropped
    /// and a warning is logged.
    ///
    /// No-op if the deferred is already settled.
    pub fn resolve(&self, value: impl IntoResolution<T, E, P>) {
        if self.is_settled() {
            trace!("deferred already settled; resolution ignored");
            return;
        }

        let mut resolution = value.into_resolution();
        if leads_back_to(&resolution, &self.promise) {
            warn!("promise adopts itself; chain left pending");
            resolution = Resolution::Pending(Rc::new(Stalled));
        }

        let shared = &self.promise.shared;
        let observers = {
            let mut state = shared.state.borrow_mut();

            let observers = match &*state {
                State::Pending(observers) => Rc::clone(observers),
                State::Settled(_) => return,
            };

            *state = State::Settled(resolution.clone());
            observers
        };

        if observers.borrow().is_empty() {
            return;
        }

        let scheduler = Rc::clone(&shared.scheduler);
        shared.scheduler.schedule(Box::new(move || {
            let observers = mem::take(&mut *observers.borrow_mut());

            for observer in observers {
                resolution.clone().attach(observer, &scheduler);
            }
        }));
    }

    /// Settles the deferred as rejected with `reason`.
    ///
    /// Same as resolving with an already rejected promise. No-op if the
    /// deferred is already settled.
    pub fn reject(&self, reason: E) {
        self.resolve(Resolution::Rejected(reason));
    }

    /// Reports progress to the observers of this deferred.
    ///
    /// Their progress handlers run on the next turn, in registration order,
    /// before any success or failure dispatch scheduled after this call.
    /// Observers registered between this call and that turn are included.
    /// No-op once the deferred is settled.
    pub fn notify(&self, progress: P) {
        let observers = match &*self.promise.shared.state.borrow() {
            State::Pending(observers) => Rc::clone(observers),
            State::Settled(_) => {
                trace!("deferred already settled; progress ignored");
                return;
            }
        };

        self.promise.shared.scheduler.schedule(Box::new(move || {
            // Handlers may register observers on this deferred.
            let callbacks: Vec<_> = observers
                .borrow()
                .iter()
                .map(|observer| observer.progress_callback())
                .collect();

            for callback in callbacks {
                callback(progress.clone());
            }
        }));
    }
}

/// Returns `true` if adopting `resolution` makes `promise` wait on itself.
fn leads_back_to<T, E, P>(resolution: &Resolution<T, E, P>, promise: &Promise<T, E, P>) -> bool
where
    T: Clone + 'static,
    E: Clone + 'static,
    P: Clone + 'static,
{
    let Resolution::Pending(thenable) = resolution else {
        return false;
    };

    let mut next = Rc::clone(thenable);
    loop {
        let Some(adopted) = next.as_promise() else {
            return false;
        };

        if adopted.ptr_eq(promise) {
            return true;
        }

        let following = match &*adopted.shared.state.borrow() {
            State::Settled(Resolution::Pending(thenable)) => Rc::clone(thenable),
            _ => return false,
        };
        next = following;
    }
}

/// Outcome of a deferred whose adoption chain loops. Never delivers.
struct Stalled;

impl<T, E, P> Thenable<T, E, P> for Stalled {
    fn then_observe(&self, _observer: Observer<T, E, P>) {}
}
