//! Value cell shared by signals and stores.
//!
//! The value lives in a `spark_signals::Signal`, so reading it inside a
//! spark-signals `effect` or `derived` tracks it like any other signal.
//! Every write stores a fresh `Rc`; versions compare by identity, so a write
//! always counts as a change even when the new value equals the old one.

use std::fmt;
use std::rc::Rc;

use spark_signals::{signal, Signal};

/// One written value. Equal only to itself.
struct Version<T>(Rc<T>);

impl<T> Clone for Version<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> PartialEq for Version<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> fmt::Debug for Version<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({:p})", Rc::as_ptr(&self.0))
    }
}

pub(crate) struct ValueCell<T: 'static> {
    value: Signal<Version<T>>,
}

impl<T: 'static> ValueCell<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value: signal(Version(Rc::new(value))),
        }
    }

    /// Current version. Tracked when read from a reactive scope.
    pub(crate) fn current(&self) -> Rc<T> {
        self.value.get().0
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.current())
    }

    pub(crate) fn get(&self) -> T
    where
        T: Clone,
    {
        (*self.current()).clone()
    }

    pub(crate) fn set(&self, value: T) {
        self.value.set(Version(Rc::new(value)));
    }

    /// Clone the current value, let `f` modify the copy, store it.
    pub(crate) fn modify(&self, f: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::effect;
    use std::cell::Cell;

    #[test]
    fn test_equal_writes_are_new_versions() {
        let cell = ValueCell::new(1);
        let before = cell.current();

        cell.set(1);

        assert_eq!(cell.get(), 1);
        assert!(!Rc::ptr_eq(&before, &cell.current()));
    }

    #[test]
    fn test_reads_are_tracked() {
        let cell = Rc::new(ValueCell::new(String::from("a")));
        let runs = Rc::new(Cell::new(0));

        let reader = cell.clone();
        let runs_clone = runs.clone();
        let _effect = effect(move || {
            let _ = reader.with(|value| value.len());
            runs_clone.set(runs_clone.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        cell.set("b".into());
        assert_eq!(runs.get(), 2);

        // Same value, new version
        cell.set("b".into());
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn test_modify() {
        let cell = ValueCell::new(vec![1]);
        cell.modify(|items| items.push(2));
        assert_eq!(cell.get(), vec![1, 2]);
    }
}
