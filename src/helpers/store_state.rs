//! Component binding for [`ReducerStore`].

use crate::engine::Hooks;
use crate::state::ReducerStore;

/// Effect dependency comparing stores by identity.
struct SameStore<S: 'static, A>(ReducerStore<S, A>);

impl<S: Clone + 'static, A: 'static> PartialEq for SameStore<S, A> {
    fn eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

/// Mirror `store` into local state; returns the state and the store to dispatch on.
///
/// The subscription is made in an effect and released by its cleanup, so
/// switching to another store (or unmounting) drops the old listener.
///
/// ```ignore
/// let (todos, store) = use_store_state(hooks, &todo_store);
/// let add = move |_: &Event| store.dispatch(TodoAction::Add("milk".into()));
/// ```
pub fn use_store_state<S, A>(hooks: &mut Hooks<'_>, store: &ReducerStore<S, A>) -> (S, ReducerStore<S, A>)
where
    S: Clone + 'static,
    A: 'static,
{
    let (state, set_state) = hooks.use_state_with(|| store.get_state());

    let source = store.clone();
    hooks.use_effect(SameStore(store.clone()), move || {
        let reader = source.clone();
        source.subscribe(move || set_state.set(reader.get_state()))
    });

    (state, store.clone())
}
