//! Signal - Single-value reactive cell with direct subscribers.
//!
//! Independent of the hook engine: a signal can be created anywhere and
//! shared between components. Components read one with
//! [`Hooks::use_signal`](crate::Hooks::use_signal), which also re-renders
//! them on every `set`. The value itself is held in a spark-signals
//! signal, so spark `effect`s and `derived`s that read it track it too.
//!
//! # Example
//!
//! ```ignore
//! use sea_ui::state::create_signal;
//!
//! let count = create_signal(0);
//! let unsubscribe = count.subscribe(|| println!("changed"));
//! count.set(1); // prints "changed"
//! unsubscribe();
//! count.set(2); // silent
//! ```

use std::rc::Rc;

use crate::types::Unsubscribe;
use super::cell::ValueCell;
use super::subscribers::Subscribers;

struct SignalInner<T: 'static> {
    value: ValueCell<T>,
    subscribers: Subscribers,
}

/// Shared handle to a reactive value. Clones point to the same cell.
pub struct Signal<T: 'static> {
    inner: Rc<SignalInner<T>>,
}

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Create a signal holding `value`.
pub fn create_signal<T: 'static>(value: T) -> Signal<T> {
    Signal {
        inner: Rc::new(SignalInner {
            value: ValueCell::new(value),
            subscribers: Subscribers::new(),
        }),
    }
}

impl<T: 'static> Signal<T> {
    /// Current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.get()
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.value.with(f)
    }

    /// Replace the value and notify every subscriber, in order.
    pub fn set(&self, value: T) {
        self.inner.value.set(value);
        self.inner.subscribers.notify();
    }

    /// Derive the next value from the current one, then notify.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = self.inner.value.with(f);
        self.set(next);
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
