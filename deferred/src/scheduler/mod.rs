//! The "run later" primitive every promise operation is built on.
//!
//! Nothing in this crate blocks. Waiting is modeled as "the continuation
//! runs on a later turn", and the only way to get a later turn is
//! [`Schedule::schedule`]. Each [`Runtime`](crate::Runtime) captures one
//! scheduler and hands it to every promise it creates.
//!
//! It includes:
//! - the [`Schedule`] trait, for plugging in a host event loop,
//! - [`EventLoop`], a single-threaded FIFO implementation driven by the caller,
//! - [`EventLoopBuilder`] for configuring it.

mod builder;
mod event_loop;

pub use builder::EventLoopBuilder;
pub use event_loop::EventLoop;

use std::rc::Rc;

/// A unit of work deferred to a later turn.
pub type Task = Box<dyn FnOnce() + 'static>;

/// Defers callbacks to a future turn of execution.
///
/// Implementations must:
/// - never run `task` before `schedule` returns,
/// - run tasks in the order they were scheduled.
///
/// All ordering guarantees of promise chains (registration order of
/// observers, progress before settlement) follow from these two rules.
pub trait Schedule {
    /// Enqueues `task` to run after the current synchronous execution.
    fn schedule(&self, task: Task);
}

/// Shared handle to the scheduler a runtime was built with.
pub(crate) type Scheduler = Rc<dyn Schedule>;
