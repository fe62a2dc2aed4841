use crate::engine::Hooks;

/// Value passed on the previous render, `None` on the first one.
///
/// The stored value is swapped during the render itself, not in an effect,
/// so a changed value still reports the old one for this render.
pub fn use_previous<T: Clone + 'static>(hooks: &mut Hooks<'_>, value: T) -> Option<T> {
    let last = hooks.use_ref::<Option<T>>(None);
    last.replace(Some(value))
}
