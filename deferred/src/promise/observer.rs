use std::rc::Rc;

/// The callbacks registered by one `then`.
///
/// An observer is queued on a pending promise and handed, once the promise
/// settles, to the settled [`Resolution`](super::Resolution). Foreign
/// [`Thenable`](super::Thenable) implementations receive observers and call
/// back through [`fulfill`](Self::fulfill), [`reject`](Self::reject) and
/// [`notify`](Self::notify).
///
/// Cloning an observer shares its callbacks.
pub struct Observer<T, E, P = ()> {
    on_fulfilled: Rc<dyn Fn(T)>,
    on_rejected: Rc<dyn Fn(E)>,
    on_progress: Rc<dyn Fn(P)>,
}

impl<T, E, P> Observer<T, E, P> {
    /// Creates an observer from its success, failure and progress callbacks.
    pub fn new(
        on_fulfilled: impl Fn(T) + 'static,
        on_rejected: impl Fn(E) + 'static,
        on_progress: impl Fn(P) + 'static,
    ) -> Self {
        Self {
            on_fulfilled: Rc::new(on_fulfilled),
            on_rejected: Rc::new(on_rejected),
            on_progress: Rc::new(on_progress),
        }
    }

    /// Delivers a success value.
    pub fn fulfill(&self, value: T) {
        (self.on_fulfilled)(value)
    }

    /// Delivers a rejection reason.
    pub fn reject(&self, reason: E) {
        (self.on_rejected)(reason)
    }

    /// Delivers a progress notification.
    pub fn notify(&self, progress: P) {
        (self.on_progress)(progress)
    }

    pub(crate) fn progress_callback(&self) -> Rc<dyn Fn(P)> {
        self.on_progress.clone()
    }
}

impl<T, E, P> Clone for Observer<T, E, P> {
    fn clone(&self) -> Self {
        Self {
            on_fulfilled: self.on_fulfilled.clone(),
            on_rejected: self.on_rejected.clone(),
            on_progress: self.on_progress.clone(),
        }
    }
}
