//! Deferred values and their read-only promise views.
//!
//! A [`Deferred`] is the write side of a value that becomes available later:
//! it settles exactly once, through [`resolve`](Deferred::resolve) or
//! [`reject`](Deferred::reject), and may report progress before that. Its
//! [`Promise`] is the shareable read side, exposing only chaining.
//!
//! This module defines:
//! - the [`Thenable`] capability shared by promises and foreign promise-likes,
//! - the [`Resolution`] a deferred settles to and handlers return,
//! - [`Observer`], the callback triple queued on a pending promise.

mod core;
mod deferred;
mod observer;
mod resolution;
mod state;

pub use self::core::Promise;
pub use deferred::Deferred;
pub use observer::Observer;
pub use resolution::{IntoResolution, Resolution, Thenable};

pub(crate) use self::core::forward_progress;
