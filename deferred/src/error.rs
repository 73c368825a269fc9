//! Errors raised by the library itself.
//!
//! Promise rejections are never converted into these: a rejection reason is
//! whatever `E` the promise chain carries. [`Error`] only covers misuse or
//! exhaustion of the [`EventLoop`](crate::EventLoop) driving the chains.

use thiserror::Error;

/// Failures reported while driving an [`EventLoop`](crate::EventLoop).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The loop executed its configured number of turns and tasks were
    /// still queued.
    #[error("event loop did not go idle within {limit} turns ({pending} tasks still queued)")]
    TurnLimitExceeded {
        /// Configured turn budget for a single `run`.
        limit: usize,
        /// Tasks left in the queue when the budget ran out.
        pending: usize,
    },

    /// `turn` or `run` was called from inside a task the loop is executing.
    #[error("event loop is already running a turn")]
    Reentrant,
}

/// Result type for event loop operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
