#![allow(dead_code)]

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once per test binary, honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Shared, ordered log of events observed by handlers.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.borrow_mut().push(event.into());
    }

    /// Records `label(value)` using the value's `Debug` form.
    pub fn record<V: Debug>(&self, label: &str, value: V) {
        self.push(format!("{label}({value:?})"));
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}
