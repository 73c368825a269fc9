use super::Runtime;
use crate::promise::{Deferred, IntoResolution, Observer, Promise, Thenable, forward_progress};

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

impl Runtime {
    /// Applies handlers to a value that may or may not be a promise.
    ///
    /// `value` is coerced first, so plain values, `Result`s, promises and
    /// foreign [`Thenable`]s are all accepted. On a later turn the handlers
    /// are attached to it:
    ///
    /// - exactly one of `on_fulfilled`/`on_rejected` runs, even if a
    ///   misbehaving thenable reports both outcomes or reports one twice,
    /// - `on_progress` runs for every notification received before the
    ///   outcome; its failures are swallowed.
    ///
    /// Handler output settles the returned promise, with the same
    /// conventions as [`Promise::then_with`].
    pub fn when<V, T, U, E, P, F, R, G, S, H>(
        &self,
        value: V,
        on_fulfilled: F,
        on_rejected: G,
        on_progress: H,
    ) -> Promise<U, E, P>
    where
        V: IntoResolution<T, E, P>,
        T: Clone + 'static,
        U: Clone + 'static,
        E: Clone + 'static,
        P: Clone + 'static,
        F: FnOnce(T) -> R + 'static,
        R: IntoResolution<U, E, P>,
        G: FnOnce(E) -> S + 'static,
        S: IntoResolution<U, E, P>,
        H: FnMut(P) -> Result<P, E> + 'static,
    {
        let result = self.defer();
        let done = Rc::new(Cell::new(false));
        let source = self.coerce(value);

        let observer = Observer::new(
            once(&result, &done, on_fulfilled),
            once(&result, &done, on_rejected),
            forward_progress(&result, on_progress),
        );

        self.scheduler
            .schedule(Box::new(move || source.then_observe(observer)));

        result.promise()
    }
}

/// Wraps a handler so that only the first outcome across both paths settles
/// `result`.
fn once<A, U, E, P, F, R>(
    result: &Deferred<U, E, P>,
    done: &Rc<Cell<bool>>,
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
    let done = done.clone();
    let handler = Cell::new(Some(handler));

    move |input| {
        if done.replace(true) {
            debug!("thenable reported more than one outcome; ignored");
            return;
        }

        if let Some(handler) = handler.take() {
            result.resolve(handler(input));
        }
    }
}
