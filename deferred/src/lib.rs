//! # Deferred
//!
//! **Deferred** is a small, single-threaded promise library: values that
//! become available later, chains of computations on them that never block,
//! and combinators that wait on many of them at once.
//!
//! Everything is built on one injected primitive, [`Schedule`], which runs
//! a callback on a later turn. The crate ships [`EventLoop`], a FIFO
//! implementation you drive yourself, but any host loop can implement the
//! trait.
//!
//! The library offers:
//!
//! - **Deferreds** that settle exactly once and report progress before that
//! - **Promises** with `then`, `catch`, `finally` and progress chaining
//! - **Flattening**: resolving with a promise adopts its outcome, at any depth
//! - **Combinators**: `coerce` (value → promise), `reject`, `when` and `all`
//! - A `#[deferred::test]` attribute for tests that drive an event loop
//!
//! ## Quick Start
//!
//! ```rust
//! use deferred::{Deferred, EventLoop, Promise};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let event_loop = EventLoop::new();
//! let runtime = event_loop.runtime();
//!
//! // Producer side: settle later.
//! let deferred: Deferred<u32, String> = runtime.defer();
//!
//! // Consumer side: chain without blocking.
//! let seen = Rc::new(Cell::new(0));
//! let sink = seen.clone();
//! let _done: Promise<(), String> = deferred
//!     .promise()
//!     .then(|n| Ok(n + 1))
//!     .then(move |n| {
//!         sink.set(n);
//!         Ok(())
//!     });
//!
//! deferred.resolve(Ok(41));
//! event_loop.run().unwrap();
//!
//! assert_eq!(seen.get(), 42);
//! ```
//!
//! ## Modules
//!
//! - [`promise`] — deferreds, promises, observers and resolutions
//! - [`scheduler`] — the scheduling primitive and the event loop
//! - [`error`] — event loop errors

mod runtime;

pub mod error;
pub mod promise;
pub mod scheduler;

pub use error::Error;
pub use promise::{Deferred, IntoResolution, Observer, Promise, Resolution, Thenable};
pub use runtime::{Aggregate, Runtime};
pub use scheduler::{EventLoop, EventLoopBuilder, Schedule, Task};

pub use deferred_macros::test;
