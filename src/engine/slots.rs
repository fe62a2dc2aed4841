//! Hook slots - Positional state cells of a component instance.
//!
//! Each hook call of a render claims the next slot. A slot is created on the
//! instance's first render and then mutated in place: the `Rc` holding its
//! data is never replaced, so anything handed out from it (setters, refs,
//! memoized callbacks) stays tied to the same storage for the instance's life.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::types::Cleanup;

/// Kind of hook that created a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    State,
    Reducer,
    Effect,
    Memo,
    Ref,
    Callback,
    Subscription,
    Destroy,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::State => "state",
            Self::Reducer => "reducer",
            Self::Effect => "effect",
            Self::Memo => "memo",
            Self::Ref => "ref",
            Self::Callback => "callback",
            Self::Subscription => "subscription",
            Self::Destroy => "destroy",
        })
    }
}

/// One slot. `data` is the typed cell of the hook (downcast on access);
/// `cleanup` holds the teardown action of effects and subscriptions.
pub(crate) struct HookCell {
    pub(crate) kind: HookKind,
    pub(crate) data: Rc<dyn Any>,
    pub(crate) cleanup: RefCell<Option<Cleanup>>,
}

impl HookCell {
    pub(crate) fn new(kind: HookKind, data: Rc<dyn Any>) -> Self {
        Self {
            kind,
            data,
            cleanup: RefCell::new(None),
        }
    }

    /// Typed view of the slot data.
    pub(crate) fn downcast<C: 'static>(&self) -> Option<Rc<C>> {
        self.data.clone().downcast::<C>().ok()
    }

    /// Replace the pending cleanup, running the previous one first.
    pub(crate) fn replace_cleanup(&self, cleanup: Option<Cleanup>) {
        let previous = self.cleanup.borrow_mut().take();
        if let Some(previous) = previous {
            previous();
        }
        *self.cleanup.borrow_mut() = cleanup;
    }

    /// Run and clear the pending cleanup.
    pub(crate) fn run_cleanup(&self) {
        let cleanup = self.cleanup.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }
}

// =============================================================================
// Typed Cells
// =============================================================================

/// `use_effect` slot: dependencies of the last run.
pub(crate) struct EffectCell<D> {
    pub(crate) deps: RefCell<Option<D>>,
}

/// `use_memo` slot.
pub(crate) struct MemoCell<T, D> {
    pub(crate) value: RefCell<T>,
    pub(crate) deps: RefCell<D>,
}

/// `use_callback` slot.
pub(crate) struct CallbackCell<F: ?Sized, D> {
    pub(crate) callback: RefCell<Rc<F>>,
    pub(crate) deps: RefCell<D>,
}

/// `use_reducer` slot.
pub(crate) struct ReducerCell<S, A> {
    pub(crate) state: Rc<RefCell<S>>,
    pub(crate) reducer: Rc<dyn Fn(&S, A) -> S>,
}

/// Dependencies changed since the stored list (or none stored yet).
pub(crate) fn deps_changed<D: PartialEq>(previous: Option<&D>, next: &D) -> bool {
    previous.is_none_or(|previous| previous != next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_deps_changed() {
        assert!(deps_changed::<(i32,)>(None, &(1,)));
        assert!(!deps_changed(Some(&(1, "a")), &(1, "a")));
        assert!(deps_changed(Some(&(1, "a")), &(1, "b")));
        assert!(!deps_changed(Some(&()), &()));
    }

    #[test]
    fn test_downcast_checks_type() {
        let cell = HookCell::new(HookKind::State, Rc::new(RefCell::new(5_i32)));
        assert!(cell.downcast::<RefCell<i32>>().is_some());
        assert!(cell.downcast::<RefCell<String>>().is_none());
    }

    #[test]
    fn test_replace_cleanup_runs_previous() {
        let runs = Rc::new(Cell::new(0));
        let cell = HookCell::new(HookKind::Effect, Rc::new(()));

        let runs_clone = runs.clone();
        cell.replace_cleanup(Some(Box::new(move || runs_clone.set(runs_clone.get() + 1))));
        assert_eq!(runs.get(), 0);

        cell.replace_cleanup(None);
        assert_eq!(runs.get(), 1);

        cell.run_cleanup();
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(HookKind::Memo.to_string(), "memo");
        assert_eq!(HookKind::Subscription.to_string(), "subscription");
    }
}
