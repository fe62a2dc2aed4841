//! Store - Aggregate reactive state updated by shallow merge.
//!
//! `set_state(patch)` merges the patch into the current state one top-level
//! field at a time (insert or replace), then notifies every subscriber once.
//! Nested values are replaced, never merged. Like [`Signal`](super::Signal),
//! the state is held in a spark-signals signal.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::types::Unsubscribe;
use super::cell::ValueCell;
use super::subscribers::Subscribers;

// =============================================================================
// Merge
// =============================================================================

/// State shapes that accept a shallow field merge.
pub trait Merge {
    type Patch;

    fn merge(&mut self, patch: Self::Patch);
}

impl Merge for Map<String, Value> {
    type Patch = Map<String, Value>;

    fn merge(&mut self, patch: Self::Patch) {
        for (key, value) in patch {
            self.insert(key, value);
        }
    }
}

/// Objects merge field by field; any other patch replaces the value.
impl Merge for Value {
    type Patch = Value;

    fn merge(&mut self, patch: Self::Patch) {
        match (self, patch) {
            (Value::Object(state), Value::Object(patch)) => state.merge(patch),
            (state, patch) => *state = patch,
        }
    }
}

impl<K: Hash + Eq, V> Merge for HashMap<K, V> {
    type Patch = HashMap<K, V>;

    fn merge(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}

impl<K: Ord, V> Merge for BTreeMap<K, V> {
    type Patch = BTreeMap<K, V>;

    fn merge(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}

// =============================================================================
// Store
// =============================================================================

struct StoreInner<S: 'static> {
    state: ValueCell<S>,
    subscribers: Subscribers,
}

/// Shared handle to an aggregate state object.
pub struct Store<S: 'static> {
    inner: Rc<StoreInner<S>>,
}

impl<S: 'static> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Create a store holding `initial`.
pub fn create_store<S: Merge + 'static>(initial: S) -> Store<S> {
    Store {
        inner: Rc::new(StoreInner {
            state: ValueCell::new(initial),
            subscribers: Subscribers::new(),
        }),
    }
}

impl<S: Merge + 'static> Store<S> {
    pub fn get_state(&self) -> S
    where
        S: Clone,
    {
        self.inner.state.get()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.inner.state.with(f)
    }

    /// Shallow-merge `patch` into a copy of the state, store it and notify
    /// subscribers.
    pub fn set_state(&self, patch: S::Patch)
    where
        S: Clone,
    {
        self.inner.state.modify(|state| state.merge(patch));
        self.inner.subscribers.notify();
    }

    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn() + 'static,
    {
        self.inner.subscribers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
