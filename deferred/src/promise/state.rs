use super::{Observer, Resolution};

use std::cell::RefCell;
use std::rc::Rc;

/// Observers waiting on a pending promise, in registration order.
///
/// Progress dispatches scheduled while the promise is pending hold the same
/// list, so they reach every observer registered before they run.
pub(crate) type Observers<T, E, P> = Rc<RefCell<Vec<Observer<T, E, P>>>>;

/// Lifecycle of a promise.
///
/// The only transition is `Pending` → `Settled`, taken once by the paired
/// [`Deferred`](super::Deferred). Promises built by `coerce`/`reject` start
/// out `Settled`.
pub(crate) enum State<T, E, P> {
    /// No outcome yet.
    Pending(Observers<T, E, P>),

    /// The outcome, or the thenable it will be read from.
    Settled(Resolution<T, E, P>),
}
