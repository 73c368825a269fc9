use super::Runtime;
use crate::promise::{Deferred, IntoResolution, Observer, Promise, Thenable};

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;

use tracing::trace;

/// A keyed collection of inputs for [`Runtime::all`].
///
/// The aggregate mirrors the shape of its input: a `Vec` of promises yields
/// a `Vec` of values in the same order, a map yields a map with the same
/// keys.
pub trait Aggregate {
    /// Identifies an entry: an index for sequences, the key for maps.
    type Key: Clone + 'static;

    /// The input stored under each key.
    type Item;

    /// The same-shaped container holding resolved values.
    type Output<T>;

    /// Splits the collection into its entries, in iteration order.
    fn into_entries(self) -> Vec<(Self::Key, Self::Item)>;

    /// Rebuilds the container from resolved entries.
    fn from_entries<T>(entries: Vec<(Self::Key, T)>) -> Self::Output<T>;
}

impl<V> Aggregate for Vec<V> {
    type Key = usize;
    type Item = V;
    type Output<T> = Vec<T>;

    fn into_entries(self) -> Vec<(usize, V)> {
        self.into_iter().enumerate().collect()
    }

    fn from_entries<T>(entries: Vec<(usize, T)>) -> Vec<T> {
        entries.into_iter().map(|(_, value)| value).collect()
    }
}

impl<K, V> Aggregate for BTreeMap<K, V>
where
    K: Ord + Clone + 'static,
{
    type Key = K;
    type Item = V;
    type Output<T> = BTreeMap<K, T>;

    fn into_entries(self) -> Vec<(K, V)> {
        self.into_iter().collect()
    }

    fn from_entries<T>(entries: Vec<(K, T)>) -> BTreeMap<K, T> {
        entries.into_iter().collect()
    }
}

impl<K, V, H> Aggregate for HashMap<K, V, H>
where
    K: Eq + Hash + Clone + 'static,
    H: BuildHasher + Default,
{
    type Key = K;
    type Item = V;
    type Output<T> = HashMap<K, T, H>;

    fn into_entries(self) -> Vec<(K, V)> {
        self.into_iter().collect()
    }

    fn from_entries<T>(entries: Vec<(K, T)>) -> HashMap<K, T, H> {
        entries.into_iter().collect()
    }
}

/// Values recorded so far, one slot per input entry.
struct Slots<K, T> {
    keys: Vec<K>,
    values: Vec<Option<T>>,
    remaining: usize,
}

impl<K: Clone, T: Clone> Slots<K, T> {
    fn is_recorded(&self, index: usize) -> bool {
        self.values[index].is_some()
    }

    /// Records `value` for entry `index`. Returns the full entry list once
    /// every slot is filled.
    fn record(&mut self, index: usize, value: T) -> Option<Vec<(K, T)>> {
        self.values[index] = Some(value);
        self.remaining -= 1;

        if self.remaining > 0 {
            return None;
        }

        Some(
            self.keys
                .iter()
                .cloned()
                .zip(self.values.iter().flatten().cloned())
                .collect(),
        )
    }
}

impl Runtime {
    /// Waits for every input to fulfil, or for the first one to reject.
    ///
    /// Each input is coerced, so plain values and promises can be mixed.
    /// The returned promise fulfils with a container shaped like `inputs`
    /// holding every resolved value, or rejects with the reason of the first
    /// input to reject. Later outcomes are ignored. An empty input fulfils
    /// with an empty container.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use deferred::{Deferred, EventLoop, Promise};
    ///
    /// let event_loop = EventLoop::new();
    /// let runtime = event_loop.runtime();
    ///
    /// let first: Deferred<i32, String> = runtime.defer();
    /// let second: Deferred<i32, String> = runtime.defer();
    /// let both: Promise<Vec<i32>, String> =
    ///     runtime.all(vec![first.promise(), second.promise()]);
    ///
    /// second.resolve(Ok(2));
    /// first.resolve(Ok(1));
    /// event_loop.run().unwrap();
    /// # let _ = both;
    /// ```
    pub fn all<C, T, E, P>(&self, inputs: C) -> Promise<C::Output<T>, E, P>
    where
        C: Aggregate + 'static,
        C::Item: IntoResolution<T, E, P>,
        C::Output<T>: Clone + 'static,
        T: Clone + 'static,
        E: Clone + 'static,
        P: Clone + 'static,
    {
        let aggregate: Deferred<C::Output<T>, E, P> = self.defer();
        let (keys, items): (Vec<_>, Vec<_>) = inputs.into_entries().into_iter().unzip();

        if items.is_empty() {
            aggregate.resolve(Ok(C::from_entries::<T>(Vec::new())));
            return aggregate.promise();
        }

        let slots = Rc::new(RefCell::new(Slots {
            values: keys.iter().map(|_| None).collect(),
            remaining: keys.len(),
            keys,
        }));

        for (index, item) in items.into_iter().enumerate() {
            let on_fulfilled = {
                let slots = slots.clone();
                let aggregate = aggregate.clone();

                move |value: T| {
                    let mut slots = slots.borrow_mut();
                    if slots.is_recorded(index) {
                        return;
                    }

                    if let Some(entries) = slots.record(index, value) {
                        drop(slots);
                        trace!(entries = entries.len(), "aggregate complete");
                        aggregate.resolve(Ok(C::from_entries(entries)));
                    }
                }
            };

            let on_rejected = {
                let slots = slots.clone();
                let aggregate = aggregate.clone();

                move |reason: E| {
                    if slots.borrow().is_recorded(index) {
                        return;
                    }

                    aggregate.reject(reason);
                }
            };

            self.coerce(item)
                .then_observe(Observer::new(on_fulfilled, on_rejected, |_: P| {}));
        }

        aggregate.promise()
    }
}
