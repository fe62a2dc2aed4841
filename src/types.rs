//! Core types shared across the runtime.
//!
//! - [`NodeId`] - Handle to a node in the host tree
//! - [`InstanceId`] - Handle to a mounted component instance
//! - [`Cleanup`] / [`IntoCleanup`] - Teardown actions returned by effects
//! - [`Event`] / [`EventHandler`] - Host events delivered to `on*` props
//! - [`InstanceFlags`] - Lifecycle bits of a component instance

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Host Node Handle
// =============================================================================

/// Opaque handle to a node in the host tree.
///
/// The host owns the nodes; the runtime only stores and passes these handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a host-specific raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-specific raw id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// =============================================================================
// Instance Handle
// =============================================================================

/// Handle to a component instance.
///
/// Indices are recycled by the registry; the generation tells a live
/// instance apart from a destroyed one that used the same index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId {
    index: u32,
    generation: u32,
}

impl InstanceId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the registry.
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the slot when this instance was allocated.
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Cleanup
// =============================================================================

/// Teardown action run once, when an effect re-runs or its instance is destroyed.
pub type Cleanup = Box<dyn FnOnce()>;

/// Closure returned by `subscribe`; removes exactly that subscription.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// Values an effect body may return.
///
/// `()` means no cleanup. A boxed closure (or `Some` of one) is kept and run
/// before the effect fires again, or when the instance is torn down.
pub trait IntoCleanup {
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl IntoCleanup for Cleanup {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(self)
    }
}

impl IntoCleanup for Option<Cleanup> {
    fn into_cleanup(self) -> Option<Cleanup> {
        self
    }
}

// =============================================================================
// Events
// =============================================================================

/// An event delivered by the host to a listener registered from an `on*` prop.
#[derive(Debug)]
pub struct Event {
    /// Lower-cased event name (`click`, `input`, ...).
    pub name: String,
    /// Node the event was dispatched on.
    pub target: NodeId,
    /// Host-provided payload (input value, key, coordinates...).
    pub detail: serde_json::Value,
    default_prevented: Cell<bool>,
}

impl Event {
    pub fn new(name: impl Into<String>, target: NodeId) -> Self {
        Self {
            name: name.into(),
            target,
            detail: serde_json::Value::Null,
            default_prevented: Cell::new(false),
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = detail;
        self
    }

    /// Ask the host to skip its default action for this event.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Listener bound to a host node.
///
/// `Rc` so the same handler can be cloned into several closures and the
/// host can call it after releasing its own borrows.
pub type EventHandler = Rc<dyn Fn(&Event)>;

// =============================================================================
// Instance Lifecycle Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Lifecycle state of a component instance.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InstanceFlags: u8 {
        const NONE = 0;
        /// First materialization completed.
        const MOUNTED = 1 << 0;
        /// The component function is currently executing.
        const RENDERING = 1 << 1;
        /// Torn down; setters targeting it are ignored.
        const DESTROYED = 1 << 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_display() {
        let id = InstanceId::new(3, 2);
        assert_eq!(id.index(), 3);
        assert_eq!(id.generation(), 2);
        assert_eq!(id.to_string(), "i3v2");
    }

    #[test]
    fn test_into_cleanup() {
        assert!(().into_cleanup().is_none());

        let cleanup: Cleanup = Box::new(|| {});
        assert!(cleanup.into_cleanup().is_some());
        assert!(None::<Cleanup>.into_cleanup().is_none());
    }

    #[test]
    fn test_event_prevent_default() {
        let event = Event::new("click", NodeId::from_raw(7));
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
        assert_eq!(event.target.raw(), 7);
    }

    #[test]
    fn test_flags() {
        let mut flags = InstanceFlags::default();
        flags |= InstanceFlags::MOUNTED | InstanceFlags::RENDERING;
        flags.remove(InstanceFlags::RENDERING);
        assert!(flags.contains(InstanceFlags::MOUNTED));
        assert!(!flags.contains(InstanceFlags::RENDERING));
    }
}
