use super::state::State;
use super::{Deferred, IntoResolution, Observer, Resolution, Thenable};
use crate::scheduler::Scheduler;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

/// The read-only view of an eventual value.
///
/// A `Promise` is paired with a [`Deferred`], or produced already settled by
/// [`Runtime::coerce`](crate::Runtime::coerce) and
/// [`Runtime::reject`](crate::Runtime::reject). It can be cloned and shared
/// freely; it can never settle itself.
///
/// Every chaining method returns a new promise and registers its handlers
/// without running them: handlers always run on a later turn of the
/// runtime's scheduler. A handler "throws" by returning `Err(reason)`, which
/// rejects the derived promise; any other return value resolves it, and a
/// returned promise is adopted.
///
/// # Type parameters
///
/// - `T`: success value
/// - `E`: rejection reason
/// - `P`: progress notification, `()` by default
pub struct Promise<T, E, P = ()> {
    pub(crate) shared: Rc<Shared<T, E, P>>,
}

pub(crate) struct Shared<T, E, P> {
    /// Pending observers or the settled resolution.
    pub(crate) state: RefCell<State<T, E, P>>,

    /// Scheduler every continuation of this promise runs on.
    pub(crate) scheduler: Scheduler,
}

impl<T, E, P> Clone for Promise<T, E, P> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T, E, P> Promise<T, E, P>
where
    T: Clone + 'static,
    E: Clone + 'static,
    P: Clone + 'static,
{
    pub(crate) fn pending(scheduler: Scheduler) -> Self {
        Self::with_state(State::Pending(Rc::default()), scheduler)
    }

    pub(crate) fn from_resolution(resolution: Resolution<T, E, P>, scheduler: Scheduler) -> Self {
        Self::with_state(State::Settled(resolution), scheduler)
    }

    fn with_state(state: State<T, E, P>, scheduler: Scheduler) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(state),
                scheduler,
            }),
        }
    }

    /// Returns `true` if both handles view the same promise.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Chains a success handler.
    ///
    /// Rejections skip `on_fulfilled` and reject the returned promise with
    /// the same reason. Progress is forwarded unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferred::{EventLoop, Promise};
    ///
    /// let event_loop = EventLoop::new();
    /// let runtime = event_loop.runtime();
    ///
    /// let doubled: Promise<i32, String> = runtime.resolved(21).then(|n| Ok(n * 2));
    /// # let _ = doubled;
    /// event_loop.run().unwrap();
    /// ```
    pub fn then<U, F, R>(&self, on_fulfilled: F) -> Promise<U, E, P>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> R + 'static,
        R: IntoResolution<U, E, P>,
    {
        self.then_with(on_fulfilled, Resolution::Rejected, Ok)
    }

    /// Chains a success handler and a failure handler.
    ///
    /// Exactly one of them runs. Either may recover or fail the returned
    /// promise.
    pub fn then_or_else<U, F, R, G, S>(&self, on_fulfilled: F, on_rejected: G) -> Promise<U, E, P>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> R + 'static,
        R: IntoResolution<U, E, P>,
        G: FnOnce(E) -> S + 'static,
        S: IntoResolution<U, E, P>,
    {
        self.then_with(on_fulfilled, on_rejected, Ok)
    }

    /// Chains success, failure and progress handlers.
    ///
    /// - `on_fulfilled`/`on_rejected` run at most once, and only one of them.
    ///   Their output settles the returned promise.
    /// - `on_progress` runs for every notification received while this
    ///   promise is pending. `Ok(progress)` is re-emitted as progress of the
    ///   returned promise; an `Err` is dropped and never rejects anything.
    pub fn then_with<U, F, R, G, S, H>(
        &self,
        on_fulfilled: F,
        on_rejected: G,
        on_progress: H,
    ) -> Promise<U, E, P>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> R + 'static,
        R: IntoResolution<U, E, P>,
        G: FnOnce(E) -> S + 'static,
        S: IntoResolution<U, E, P>,
        H: FnMut(P) -> Result<P, E> + 'static,
    {
        let result = Deferred::new(self.shared.scheduler.clone());

        self.then_observe(Observer::new(
            settle_with(&result, on_fulfilled),
            settle_with(&result, on_rejected),
            forward_progress(&result, on_progress),
        ));

        result.promise()
    }

    /// Chains a failure handler. Success values pass through unchanged.
    pub fn catch<G, S>(&self, on_rejected: G) -> Promise<T, E, P>
    where
        G: FnOnce(E) -> S + 'static,
        S: IntoResolution<T, E, P>,
    {
        self.then_with(Resolution::Fulfilled, on_rejected, Ok)
    }

    /// Chains a progress handler. The outcome passes through unchanged.
    pub fn progress<H>(&self, on_progress: H) -> Promise<T, E, P>
    where
        H: FnMut(P) -> Result<P, E> + 'static,
    {
        self.then_with(Resolution::Fulfilled, Resolution::Rejected, on_progress)
    }

    /// Runs `on_settled` whatever the outcome, then carries the outcome on.
    ///
    /// `on_settled` does not see the value or reason. If it returns a
    /// promise, the returned promise waits for it. The original outcome is
    /// kept unless `on_settled` returns `Err` or a promise that rejects: that
    /// reason replaces it.
    pub fn finally<X, F, R>(&self, on_settled: F) -> Promise<T, E, P>
    where
        X: Clone + 'static,
        F: FnOnce() -> R + 'static,
        R: IntoResolution<X, E, P>,
    {
        let callback = Rc::new(Cell::new(Some(on_settled)));
        let on_rejected = callback.clone();
        let scheduler = self.shared.scheduler.clone();
        let rejected_scheduler = scheduler.clone();

        self.then_or_else(
            move |value| run_finally(&callback, &scheduler, Resolution::Fulfilled(value)),
            move |reason| {
                run_finally(&on_rejected, &rejected_scheduler, Resolution::Rejected(reason))
            },
        )
    }

    /// A promise settling exactly like this one, one turn later.
    ///
    /// Same as [`finally`](Self::finally) with a callback that does nothing.
    pub fn passthrough(&self) -> Promise<T, E, P> {
        self.finally(|| Ok::<(), E>(()))
    }
}

impl<T, E, P> Thenable<T, E, P> for Promise<T, E, P>
where
    T: Clone + 'static,
    E: Clone + 'static,
    P: Clone + 'static,
{
    fn then_observe(&self, observer: Observer<T, E, P>) {
        let resolution = match &*self.shared.state.borrow() {
            State::Pending(observers) => {
                observers.borrow_mut().push(observer);
                return;
            }
            State::Settled(resolution) => resolution.clone(),
        };

        resolution.attach(observer, &self.shared.scheduler);
    }

    fn as_promise(&self) -> Option<&Promise<T, E, P>> {
        Some(self)
    }
}

/// Wraps a success or failure handler so its output settles `result`.
pub(crate) fn settle_with<A, U, E, P, F, R>(
    result: &Deferred<U, E, P>,
    handler: F,
) -> impl Fn(A) + 'static
where
    A: 'static,
    U: Clone + 'static,
    E: Clone + 'static,
    P: Clone + 'static,
    F: FnOnce(A) -> R + 'static,
    R: IntoResolution<U, E, P>,
{
    let result = result.clone();
    let handler = Cell::new(Some(handler));

    move |input| {
        if let Some(handler) = handler.take() {
            result.resolve(handler(input));
        }
    }
}

/// Wraps a progress handler so its output becomes progress of `result`.
///
/// Handler failures are swallowed.
pub(crate) fn forward_progress<U, E, P, H>(
    result: &Deferred<U, E, P>,
    handler: H,
) -> impl Fn(P) + 'static
where
    U: Clone + 'static,
    E: Clone + 'static,
    P: Clone + 'static,
    H: FnMut(P) -> Result<P, E> + 'static,
{
    let result = result.clone();
    let handler = RefCell::new(handler);

    move |progress| {
        let Ok(mut handler) = handler.try_borrow_mut() else {
            return;
        };

        match (&mut *handler)(progress) {
            Ok(progress) => result.notify(progress),
            Err(_) => debug!("progress handler failed; notification dropped"),
        }
    }
}

/// Runs a `finally` callback and decides what the derived promise settles to.
fn run_finally<T, E, P, X, F, R>(
    callback: &Cell<Option<F>>,
    scheduler: &Scheduler,
    outcome: Resolution<T, E, P>,
) -> Resolution<T, E, P>
where
    T: Clone + 'static,
    E: Clone + 'static,
    P: Clone + 'static,
    X: Clone + 'static,
    F: FnOnce() -> R,
    R: IntoResolution<X, E, P>,
{
    let Some(callback) = callback.take() else {
        return outcome;
    };

    match callback().into_resolution() {
        Resolution::Fulfilled(_) => outcome,
        Resolution::Rejected(reason) => Resolution::Rejected(reason),
        Resolution::Pending(thenable) => {
            let gate = Promise::<X, E, P>::from_resolution(
                Resolution::Pending(thenable),
                scheduler.clone(),
            );

            gate.then_or_else(move |_| outcome, Resolution::Rejected)
                .into_resolution()
        }
    }
}
