//! Host tree boundary.
//!
//! The runtime never owns UI nodes. It asks a [`Host`] to create them, wire
//! them together and attach listeners, and addresses them by [`NodeId`].

use serde_json::Value;

use crate::types::{EventHandler, NodeId};

/// Capabilities the runtime needs from the environment's node tree.
///
/// Methods take `&self`: hosts are shared with event handlers and use
/// interior mutability.
pub trait Host {
    /// Create a detached element node for `tag`.
    fn create_element(&self, tag: &str) -> NodeId;

    /// Create a detached text node.
    fn create_text(&self, text: &str) -> NodeId;

    /// Assign a property on an element, unsanitized.
    fn set_property(&self, node: NodeId, name: &str, value: &Value);

    /// Register `handler` for events named `event` (already lower-cased).
    fn add_event_listener(&self, node: NodeId, event: &str, handler: EventHandler);

    /// Append `child` as the last child of `parent`.
    fn append_child(&self, parent: NodeId, child: NodeId);

    /// Put `new_child` where `old_child` sits under `parent`; `old_child` is detached.
    fn replace_child(&self, parent: NodeId, new_child: NodeId, old_child: NodeId);

    /// Detach `child` from `parent`.
    fn remove_child(&self, parent: NodeId, child: NodeId);

    /// Current parent of `node`, if attached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;
}

/// Event name bound by a property: `onClick` listens for `click`.
pub(crate) fn event_name(prop: &str) -> Option<String> {
    prop.strip_prefix("on")
        .filter(|rest| !rest.is_empty())
        .map(str::to_lowercase)
}
