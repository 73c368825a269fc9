use super::{EventLoopBuilder, Schedule, Task};
use crate::error::{Error, Result};
use crate::runtime::Runtime;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, trace, warn};

/// A single-threaded, caller-driven task queue.
///
/// `EventLoop` is the default [`Schedule`] implementation. Scheduling only
/// appends to a FIFO queue; tasks run when the owner calls [`turn`](Self::turn)
/// or [`run`](Self::run). Tasks scheduled while a task runs land at the back
/// of the queue and therefore run on a later turn.
///
/// The handle is cheap to clone; clones share the same queue.
#[derive(Clone)]
pub struct EventLoop {
    inner: Rc<Inner>,
}

struct Inner {
    /// Tasks waiting for their turn, oldest first.
    queue: RefCell<VecDeque<Task>>,

    /// Set while a task is executing.
    running: Cell<bool>,

    /// Turn budget for a single `run`.
    max_turns: usize,

    /// Total number of turns executed by this loop.
    turns: Cell<u64>,
}

/// Clears the running flag when a turn ends, including by unwinding.
struct RunningGuard<'a>(&'a Cell<bool>);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl EventLoop {
    /// Creates an event loop with the default configuration.
    pub fn new() -> Self {
        EventLoopBuilder::new().build()
    }

    /// Returns a builder for configuring an event loop.
    pub fn builder() -> EventLoopBuilder {
        EventLoopBuilder::new()
    }

    pub(crate) fn with_max_turns(max_turns: usize) -> Self {
        Self {
            inner: Rc::new(Inner {
                queue: RefCell::new(VecDeque::new()),
                running: Cell::new(false),
                max_turns,
                turns: Cell::new(0),
            }),
        }
    }

    /// Creates a [`Runtime`] whose promises schedule onto this loop.
    pub fn runtime(&self) -> Runtime {
        Runtime::new(self.clone())
    }

    /// Number of tasks waiting to run.
    pub fn queued(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// Returns `true` if no task is waiting to run.
    pub fn is_idle(&self) -> bool {
        self.inner.queue.borrow().is_empty()
    }

    /// Total number of turns this loop has executed.
    pub fn turns(&self) -> u64 {
        self.inner.turns.get()
    }

    /// Runs the oldest queued task, if any.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if a task ran.
    /// - `Ok(false)` if the queue was empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] when called from inside a running task.
    pub fn turn(&self) -> Result<bool> {
        if self.inner.running.get() {
            return Err(Error::Reentrant);
        }

        // The queue borrow must end before the task runs: tasks schedule.
        let Some(task) = self.inner.queue.borrow_mut().pop_front() else {
            return Ok(false);
        };

        self.inner.running.set(true);
        let _guard = RunningGuard(&self.inner.running);

        let turn = self.inner.turns.get() + 1;
        self.inner.turns.set(turn);
        trace!(turn, queued = self.queued(), "running turn");

        task();

        Ok(true)
    }

    /// Runs turns until the queue is empty.
    ///
    /// # Returns
    ///
    /// The number of turns executed by this call.
    ///
    /// # Errors
    ///
    /// - [`Error::TurnLimitExceeded`] if the configured turn budget is spent
    ///   while tasks are still queued.
    /// - [`Error::Reentrant`] when called from inside a running task.
    pub fn run(&self) -> Result<usize> {
        let limit = self.inner.max_turns;
        let mut executed = 0;

        while executed < limit {
            if !self.turn()? {
                debug!(turns = executed, "event loop idle");
                return Ok(executed);
            }

            executed += 1;
        }

        let pending = self.queued();
        if pending == 0 {
            debug!(turns = executed, "event loop idle");
            return Ok(executed);
        }

        warn!(limit, pending, "event loop turn budget exhausted");
        Err(Error::TurnLimitExceeded { limit, pending })
    }
}

impl Default for EventLoop {
    /// Creates an event loop with the default configuration.
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule for EventLoop {
    fn schedule(&self, task: Task) {
        self.inner.queue.borrow_mut().push_back(task);
    }
}
