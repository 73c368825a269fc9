use super::EventLoop;

/// Turn budget used when none is configured.
pub(crate) const DEFAULT_MAX_TURNS: usize = 1 << 20;

/// Builder for configuring and creating an [`EventLoop`].
///
/// Currently, it supports configuring the number of turns a single
/// [`EventLoop::run`] may execute before giving up.
///
/// # Examples
///
/// ```rust
/// let event_loop = deferred::EventLoop::builder()
///     .max_turns(64)
///     .build();
///
/// assert!(event_loop.is_idle());
/// ```
pub struct EventLoopBuilder {
    /// Turn budget for a single `run`.
    max_turns: usize,
}

impl EventLoopBuilder {
    /// Creates a new `EventLoopBuilder` with default configuration.
    pub fn new() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Sets how many turns [`EventLoop::run`] executes before reporting
    /// [`Error::TurnLimitExceeded`](crate::Error::TurnLimitExceeded).
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn max_turns(mut self, n: usize) -> Self {
        assert!(n > 0, "max_turns must be > 0");

        self.max_turns = n;
        self
    }

    /// Builds the event loop with the configured options.
    pub fn build(self) -> EventLoop {
        EventLoop::with_max_turns(self.max_turns)
    }
}

impl Default for EventLoopBuilder {
    /// Creates a default `EventLoopBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
