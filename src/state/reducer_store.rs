//! Reducer store - Standalone state container driven by actions.
//!
//! `dispatch(action)` runs the reducer and notifies subscribers.
//! `dispatch_thunk(f)` hands `f` the store and a state getter instead; the
//! thunk decides when (and whether) to dispatch real actions.

use std::rc::Rc;

use crate::types::Unsubscribe;
use super::cell::ValueCell;
use super::subscribers::Subscribers;

struct ReducerStoreInner<S: 'static, A> {
    state: ValueCell<S>,
    reducer: Box<dyn Fn(&S, A) -> S>,
    subscribers: Subscribers,
}

/// Shared handle to a reducer-driven state container.
pub struct ReducerStore<S: 'static, A> {
    inner: Rc<ReducerStoreInner<S, A>>,
}

impl<S: 'static, A> Clone for ReducerStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Create a reducer store.
pub fn create_reducer_store<S, A, R>(reducer: R, initial: S) -> ReducerStore<S, A>
where
    S: 'static,
    A: 'static,
    R: Fn(&S, A) -> S + 'static,
{
    ReducerStore {
        inner: Rc::new(ReducerStoreInner {
            state: ValueCell::new(initial),
            reducer: Box::new(reducer),
            subscribers: Subscribers::new(),
        }),
    }
}

impl<S: Clone + 'static, A: 'static> ReducerStore<S, A> {
    pub fn get_state(&self) -> S {
        self.inner.state.get()
    }

    /// Reduce `action` into the state and notify subscribers.
    pub fn dispatch(&self, action: A) {
        let next = self.inner.state.with(|state| (self.inner.reducer)(state, action));
        self.inner.state.set(next);
        self.inner.subscribers.notify();
    }

    /// Run `thunk` with this store and a getter for the current state.
    ///
    /// Nothing is reduced or notified unless the thunk dispatches.
    pub fn dispatch_thunk<F>(&self, thunk: F)
    where
        F: FnOnce(&Self, &dyn Fn() -> S),
    {
        let getter = || self.get_state();
        thunk(self, &getter);
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
