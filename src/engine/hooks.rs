//! Hooks - State, effect and memo primitives for component functions.
//!
//! A component function receives `&mut Hooks` for the instance being
//! rendered. Every hook call claims the next slot of that instance: the
//! cursor starts at zero on each render and advances by one per call, so a
//! component must call the same hooks in the same order on every render.
//!
//! Breaking that order is reported, not absorbed. A call that lands on a
//! slot of another kind or value type, or a render that calls more or fewer
//! hooks than the previous one, fails the render with a
//! [`RenderError`]. The offending call still returns a value (from a
//! detached cell) so the component can finish, but its output is discarded.
//!
//! # Example
//!
//! ```ignore
//! let counter = Component::new("Counter", |hooks, _props| {
//!     let (count, set_count) = hooks.use_state(0);
//!     let doubled = hooks.use_memo((count,), || count * 2);
//!
//!     hooks.use_effect((count,), move || {
//!         tracing::info!(count, "count changed");
//!     });
//!
//!     h("button", Props::new().handler("onClick", move |_| set_count.set(count + 1)), [
//!         text(format!("{count} / {doubled}")),
//!     ])
//! });
//! ```
//!
//! Effects run inline, during the render that calls them. A setter called
//! from an effect writes immediately; the re-render it requests runs once
//! the current render pass is over.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::RenderError;
use crate::state::{Merge, ReducerStore, Signal, Store};
use crate::types::{Cleanup, InstanceId, IntoCleanup, Unsubscribe};
use super::context::{Context, ScopeStack};
use super::instance::Instance;
use super::slots::{deps_changed, CallbackCell, EffectCell, HookCell, HookKind, MemoCell, ReducerCell};

// =============================================================================
// Scheduler
// =============================================================================

/// Receiver of re-render requests from setters, dispatchers and subscriptions.
pub(crate) trait Scheduler {
    fn request_update(&self, id: InstanceId);
}

fn notify(scheduler: &Weak<dyn Scheduler>, owner: InstanceId) {
    if let Some(scheduler) = scheduler.upgrade() {
        scheduler.request_update(owner);
    }
}

// =============================================================================
// Handles returned by hooks
// =============================================================================

/// Setter returned by [`Hooks::use_state`].
///
/// Bound to its own slot: calling it writes that slot and re-renders the
/// owning instance, no matter when or from where it is called.
pub struct Setter<T> {
    cell: Rc<RefCell<T>>,
    owner: InstanceId,
    scheduler: Weak<dyn Scheduler>,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            owner: self.owner,
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<T: 'static> Setter<T> {
    /// Write `value` and re-render the owner.
    pub fn set(&self, value: T) {
        *self.cell.borrow_mut() = value;
        notify(&self.scheduler, self.owner);
    }

    /// Derive the next value from the current slot value, then `set` it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.cell.borrow());
        self.set(next);
    }

    /// Current slot value (may be newer than the value the render saw).
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.cell.borrow().clone()
    }

    pub fn owner(&self) -> InstanceId {
        self.owner
    }
}

/// Dispatcher returned by [`Hooks::use_reducer`].
pub struct Dispatch<S, A> {
    state: Rc<RefCell<S>>,
    reducer: Rc<dyn Fn(&S, A) -> S>,
    owner: InstanceId,
    scheduler: Weak<dyn Scheduler>,
}

impl<S, A> Clone for Dispatch<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            reducer: self.reducer.clone(),
            owner: self.owner,
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<S: Clone + 'static, A: 'static> Dispatch<S, A> {
    /// Reduce `action` into the slot and re-render the owner.
    pub fn dispatch(&self, action: A) {
        let next = {
            let state = self.state.borrow();
            (self.reducer)(&state, action)
        };
        *self.state.borrow_mut() = next;
        notify(&self.scheduler, self.owner);
    }

    /// Run `thunk` with this dispatcher and a state getter.
    ///
    /// Nothing is reduced or re-rendered unless the thunk dispatches.
    pub fn thunk<F>(&self, thunk: F)
    where
        F: FnOnce(&Self, &dyn Fn() -> S),
    {
        let getter = || self.state();
        thunk(self, &getter);
    }

    /// Current slot state.
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }
}

/// Mutable box returned by [`Hooks::use_ref`]. Same identity on every render.
pub struct Ref<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> Ref<T> {
    pub fn current(&self) -> T
    where
        T: Clone,
    {
        self.cell.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.cell.borrow_mut() = value;
    }

    /// Swap in `value`, returning the previous content.
    pub fn replace(&self, value: T) -> T {
        self.cell.replace(value)
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.cell.borrow_mut())
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

// =============================================================================
// Hooks
// =============================================================================

/// Outcome of claiming the slot at the cursor.
enum Claim<C> {
    /// Slot exists with the expected kind and type.
    Existing(Rc<HookCell>, Rc<C>),
    /// No slot yet; the caller creates and installs one.
    Vacant,
    /// Order violation; the caller works on a throwaway cell.
    Detached,
}

/// Subscription slot marker.
struct SubscriptionCell;

/// Destroy slot marker.
struct DestroyCell;

/// Hook handle for one render of one instance.
pub struct Hooks<'a> {
    instance: &'a Instance,
    scheduler: Weak<dyn Scheduler>,
    scope: &'a ScopeStack,
    cursor: usize,
    first_render: bool,
    validate: bool,
    violation: Option<RenderError>,
}

impl<'a> Hooks<'a> {
    pub(crate) fn new(
        instance: &'a Instance,
        scheduler: Weak<dyn Scheduler>,
        scope: &'a ScopeStack,
        validate: bool,
    ) -> Self {
        Self {
            instance,
            scheduler,
            scope,
            cursor: 0,
            first_render: instance.renders.get() == 0,
            validate,
            violation: None,
        }
    }

    /// Id of the instance being rendered.
    pub fn instance_id(&self) -> InstanceId {
        self.instance.id
    }

    /// True during the instance's first render.
    pub fn is_first_render(&self) -> bool {
        self.first_render
    }

    /// Number of completed renders of this instance before this one.
    pub fn render_count(&self) -> u64 {
        self.instance.renders.get()
    }

    // =========================================================================
    // Slot bookkeeping
    // =========================================================================

    fn claim<C: 'static>(&mut self, kind: HookKind) -> Claim<C> {
        let index = self.cursor;
        self.cursor += 1;

        if self.violation.is_some() {
            return Claim::Detached;
        }

        let instance = self.instance;
        let slots = instance.slots.borrow();
        match slots.get(index) {
            Some(cell) if cell.kind != kind => {
                self.violation = Some(RenderError::HookKindChanged {
                    component: instance.name().to_string(),
                    index,
                    expected: cell.kind,
                    found: kind,
                });
                Claim::Detached
            }
            Some(cell) => match cell.downcast::<C>() {
                Some(data) => Claim::Existing(cell.clone(), data),
                None => {
                    self.violation = Some(RenderError::HookTypeChanged {
                        component: instance.name().to_string(),
                        index,
                        kind,
                    });
                    Claim::Detached
                }
            },
            None if self.first_render || !self.validate => Claim::Vacant,
            // Extra hook: reported as a count change by `finish`.
            None => Claim::Detached,
        }
    }

    fn install<C: 'static>(&mut self, kind: HookKind, data: Rc<C>) -> Rc<HookCell> {
        let cell = Rc::new(HookCell::new(kind, data));
        self.instance.slots.borrow_mut().push(cell.clone());
        cell
    }

    /// Close the render: report any order violation.
    pub(crate) fn finish(self) -> Result<(), RenderError> {
        if let Some(violation) = self.violation {
            return Err(violation);
        }

        let expected = self.instance.slot_count();
        if self.validate && !self.first_render && self.cursor != expected {
            return Err(RenderError::HookCountChanged {
                component: self.instance.name().to_string(),
                expected,
                found: self.cursor,
            });
        }
        Ok(())
    }

    // =========================================================================
    // State
    // =========================================================================

    /// State slot. Returns the current value and the slot's setter.
    pub fn use_state<T: Clone + 'static>(&mut self, initial: T) -> (T, Setter<T>) {
        self.use_state_with(move || initial)
    }

    /// State slot initialized lazily on the first render.
    pub fn use_state_with<T, F>(&mut self, init: F) -> (T, Setter<T>)
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        let cell = match self.claim::<RefCell<T>>(HookKind::State) {
            Claim::Existing(_, data) => data,
            Claim::Vacant => {
                let data = Rc::new(RefCell::new(init()));
                self.install(HookKind::State, data.clone());
                data
            }
            Claim::Detached => Rc::new(RefCell::new(init())),
        };

        let value = cell.borrow().clone();
        let setter = Setter {
            cell,
            owner: self.instance.id,
            scheduler: self.scheduler.clone(),
        };
        (value, setter)
    }

    /// Reducer slot. The reducer given on the first render is kept.
    pub fn use_reducer<S, A, R>(&mut self, reducer: R, initial: S) -> (S, Dispatch<S, A>)
    where
        S: Clone + 'static,
        A: 'static,
        R: Fn(&S, A) -> S + 'static,
    {
        let data = match self.claim::<ReducerCell<S, A>>(HookKind::Reducer) {
            Claim::Existing(_, data) => data,
            Claim::Vacant => {
                let data = Rc::new(ReducerCell {
                    state: Rc::new(RefCell::new(initial)),
                    reducer: Rc::new(reducer),
                });
                self.install(HookKind::Reducer, data.clone());
                data
            }
            Claim::Detached => Rc::new(ReducerCell {
                state: Rc::new(RefCell::new(initial)),
                reducer: Rc::new(reducer),
            }),
        };

        let state = data.state.borrow().clone();
        let dispatch = Dispatch {
            state: data.state.clone(),
            reducer: data.reducer.clone(),
            owner: self.instance.id,
            scheduler: self.scheduler.clone(),
        };
        (state, dispatch)
    }

    // =========================================================================
    // Effects
    // =========================================================================

    /// Run `effect` now if `deps` differ from the last run (or on first use).
    ///
    /// The cleanup it returns runs before the next run and on teardown.
    pub fn use_effect<D, F, R>(&mut self, deps: D, effect: F)
    where
        D: PartialEq + 'static,
        F: FnOnce() -> R,
        R: IntoCleanup,
    {
        let (cell, data) = match self.claim::<EffectCell<D>>(HookKind::Effect) {
            Claim::Existing(cell, data) => (cell, data),
            Claim::Vacant => {
                let data = Rc::new(EffectCell {
                    deps: RefCell::new(None),
                });
                let cell = self.install(HookKind::Effect, data.clone());
                (cell, data)
            }
            // The render is discarded; don't fire side effects for it.
            Claim::Detached => return,
        };

        let changed = deps_changed(data.deps.borrow().as_ref(), &deps);
        if !changed {
            return;
        }

        cell.run_cleanup();
        let cleanup = effect().into_cleanup();
        *cell.cleanup.borrow_mut() = cleanup;
        *data.deps.borrow_mut() = Some(deps);
    }

    /// Register `callback` to run when this instance is torn down.
    ///
    /// Only the callback from the first render is kept.
    pub fn on_destroy<F>(&mut self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        if let Claim::Vacant = self.claim::<DestroyCell>(HookKind::Destroy) {
            let cell = self.install(HookKind::Destroy, Rc::new(DestroyCell));
            let cleanup: Cleanup = Box::new(callback);
            *cell.cleanup.borrow_mut() = Some(cleanup);
        }
    }

    // =========================================================================
    // Memoization
    // =========================================================================

    /// Cached value, recomputed only when `deps` change.
    pub fn use_memo<T, D, F>(&mut self, deps: D, factory: F) -> T
    where
        T: Clone + 'static,
        D: PartialEq + 'static,
        F: FnOnce() -> T,
    {
        match self.claim::<MemoCell<T, D>>(HookKind::Memo) {
            Claim::Existing(_, data) => {
                let changed = deps_changed(Some(&*data.deps.borrow()), &deps);
                if changed {
                    let value = factory();
                    *data.value.borrow_mut() = value;
                    *data.deps.borrow_mut() = deps;
                }
                data.value.borrow().clone()
            }
            Claim::Vacant => {
                let value = factory();
                self.install(
                    HookKind::Memo,
                    Rc::new(MemoCell {
                        value: RefCell::new(value.clone()),
                        deps: RefCell::new(deps),
                    }),
                );
                value
            }
            Claim::Detached => factory(),
        }
    }

    /// The same `Rc` across renders until `deps` change, then the new one.
    pub fn use_callback<F, D>(&mut self, deps: D, callback: F) -> Rc<F>
    where
        F: 'static,
        D: PartialEq + 'static,
    {
        match self.claim::<CallbackCell<F, D>>(HookKind::Callback) {
            Claim::Existing(_, data) => {
                let changed = deps_changed(Some(&*data.deps.borrow()), &deps);
                if changed {
                    *data.callback.borrow_mut() = Rc::new(callback);
                    *data.deps.borrow_mut() = deps;
                }
                data.callback.borrow().clone()
            }
            Claim::Vacant => {
                let callback = Rc::new(callback);
                self.install(
                    HookKind::Callback,
                    Rc::new(CallbackCell {
                        callback: RefCell::new(callback.clone()),
                        deps: RefCell::new(deps),
                    }),
                );
                callback
            }
            Claim::Detached => Rc::new(callback),
        }
    }

    /// Mutable box that keeps its identity for the life of the instance.
    pub fn use_ref<T: 'static>(&mut self, initial: T) -> Ref<T> {
        let cell = match self.claim::<RefCell<T>>(HookKind::Ref) {
            Claim::Existing(_, data) => data,
            Claim::Vacant => {
                let data = Rc::new(RefCell::new(initial));
                self.install(HookKind::Ref, data.clone());
                data
            }
            Claim::Detached => Rc::new(RefCell::new(initial)),
        };
        Ref { cell }
    }

    // =========================================================================
    // Context & external sources
    // =========================================================================

    /// Nearest provided value of `context`, or its default. Claims no slot.
    pub fn use_context<T: Clone + 'static>(&mut self, context: &Context<T>) -> T {
        context.resolve(self.scope)
    }

    /// Read `signal` and re-render this instance whenever it is set.
    ///
    /// Subscribes on the first render; unsubscribes on teardown.
    pub fn use_signal<T: Clone + 'static>(&mut self, signal: &Signal<T>) -> T {
        self.subscribe_once(|notify| signal.subscribe(move || notify()));
        signal.get()
    }

    /// Read `store` and re-render this instance on every `set_state`.
    pub fn use_store<S: Merge + Clone + 'static>(&mut self, store: &Store<S>) -> S {
        self.subscribe_once(|notify| store.subscribe(move || notify()));
        store.get_state()
    }

    /// Read a reducer store and re-render this instance on every dispatch.
    pub fn use_reducer_store<S, A>(&mut self, store: &ReducerStore<S, A>) -> S
    where
        S: Clone + 'static,
        A: 'static,
    {
        self.subscribe_once(|notify| store.subscribe(move || notify()));
        store.get_state()
    }

    fn subscribe_once<F>(&mut self, subscribe: F)
    where
        F: FnOnce(Rc<dyn Fn()>) -> Unsubscribe,
    {
        if let Claim::Vacant = self.claim::<SubscriptionCell>(HookKind::Subscription) {
            let cell = self.install(HookKind::Subscription, Rc::new(SubscriptionCell));
            let owner = self.instance.id;
            let scheduler = self.scheduler.clone();
            let unsubscribe = subscribe(Rc::new(move || notify(&scheduler, owner)));
            *cell.cleanup.borrow_mut() = Some(unsubscribe);
        }
    }
}
