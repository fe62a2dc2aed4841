//! In-memory host tree.
//!
//! A DOM-like arena implementing [`Host`]. Nodes are never freed; detached
//! subtrees simply lose their parent link. Besides the host capabilities it
//! offers inspection (tags, text, properties, children), event dispatch and
//! a markup serializer, which is what tests and headless embedders need.
//!
//! # Example
//!
//! ```ignore
//! let host = Rc::new(MemoryHost::new());
//! let container = host.container();
//! let runtime = Runtime::new(host.clone());
//!
//! runtime.render(&h("div", Props::new(), ["hello"]), container)?;
//! assert_eq!(host.to_markup(container), "<root><div>hello</div></root>");
//! ```

use std::cell::RefCell;
use std::fmt::Write as _;

use serde_json::Value;

use crate::types::{Event, EventHandler, NodeId};
use super::host::Host;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Content {
    Element(String),
    Text(String),
}

struct MemoryNode {
    content: Content,
    properties: Vec<(String, Value)>,
    listeners: Vec<(String, EventHandler)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl MemoryNode {
    fn new(content: Content) -> Self {
        Self {
            content,
            properties: Vec::new(),
            listeners: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

/// Arena-backed host tree.
#[derive(Default)]
pub struct MemoryHost {
    nodes: RefCell<Vec<MemoryNode>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached `root` element to render into.
    pub fn container(&self) -> NodeId {
        self.create_element("root")
    }

    fn push(&self, content: Content) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(MemoryNode::new(content));
        NodeId::from_raw(nodes.len() as u64 - 1)
    }

    fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&MemoryNode) -> R) -> Option<R> {
        self.nodes.borrow().get(node.raw() as usize).map(f)
    }

    fn with_node_mut<R>(&self, node: NodeId, f: impl FnOnce(&mut MemoryNode) -> R) -> Option<R> {
        self.nodes.borrow_mut().get_mut(node.raw() as usize).map(f)
    }

    fn set_parent(&self, node: NodeId, parent: Option<NodeId>) {
        self.with_node_mut(node, |n| n.parent = parent);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Total number of nodes ever created.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Tag of an element node.
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.with_node(node, |n| match &n.content {
            Content::Element(tag) => Some(tag.clone()),
            Content::Text(_) => None,
        })
        .flatten()
    }

    /// Content of a text node.
    pub fn text(&self, node: NodeId) -> Option<String> {
        self.with_node(node, |n| match &n.content {
            Content::Text(text) => Some(text.clone()),
            Content::Element(_) => None,
        })
        .flatten()
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        if let Some(text) = self.text(node) {
            out.push_str(&text);
            return;
        }
        for child in self.children(node) {
            self.collect_text(child, out);
        }
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_node(node, |n| n.children.clone()).unwrap_or_default()
    }

    pub fn property(&self, node: NodeId, name: &str) -> Option<Value> {
        self.with_node(node, |n| {
            n.properties
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
        .flatten()
    }

    /// Property names of `node`, in assignment order.
    pub fn property_names(&self, node: NodeId) -> Vec<String> {
        self.with_node(node, |n| n.properties.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    /// Distinct event names with listeners on `node`, in registration order.
    pub fn listener_events(&self, node: NodeId) -> Vec<String> {
        let names: Vec<String> = self
            .with_node(node, |n| n.listeners.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default();

        let mut events: Vec<String> = Vec::new();
        for name in names {
            if !events.contains(&name) {
                events.push(name);
            }
        }
        events
    }

    /// Number of listeners registered for `event` on `node`.
    pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
        self.with_node(node, |n| n.listeners.iter().filter(|(name, _)| name == event).count())
            .unwrap_or(0)
    }

    /// Elements with `tag` under `root` (inclusive), in document order.
    pub fn find_all(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.find_into(root, tag, &mut found);
        found
    }

    /// First element with `tag` under `root` (inclusive).
    pub fn find(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.find_all(root, tag).into_iter().next()
    }

    fn find_into(&self, node: NodeId, tag: &str, found: &mut Vec<NodeId>) {
        if self.tag(node).as_deref() == Some(tag) {
            found.push(node);
        }
        for child in self.children(node) {
            self.find_into(child, tag, found);
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Call every listener for `event.name` on `node`, in registration order.
    ///
    /// Returns the number of listeners invoked. Listeners may mutate the tree.
    pub fn dispatch(&self, node: NodeId, event: &Event) -> usize {
        let handlers: Vec<EventHandler> = self
            .with_node(node, |n| {
                n.listeners
                    .iter()
                    .filter(|(name, _)| *name == event.name)
                    .map(|(_, handler)| handler.clone())
                    .collect()
            })
            .unwrap_or_default();

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Dispatch a fresh event named `name` at `node` and return it.
    pub fn fire(&self, node: NodeId, name: &str) -> Event {
        let event = Event::new(name, node);
        self.dispatch(node, &event);
        event
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize `node` and its subtree as markup.
    ///
    /// String properties are written verbatim, other values as JSON.
    pub fn to_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        let Some((content, properties)) = self.with_node(node, |n| (n.content.clone(), n.properties.clone()))
        else {
            return;
        };

        match content {
            Content::Text(text) => out.push_str(&escape(&text)),
            Content::Element(tag) => {
                out.push('<');
                out.push_str(&tag);
                for (name, value) in &properties {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    let _ = write!(out, " {name}=\"{}\"", escape(&value));
                }
                out.push('>');
                for child in self.children(node) {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// =============================================================================
// Host
// =============================================================================

impl Host for MemoryHost {
    fn create_element(&self, tag: &str) -> NodeId {
        self.push(Content::Element(tag.to_string()))
    }

    fn create_text(&self, text: &str) -> NodeId {
        self.push(Content::Text(text.to_string()))
    }

    fn set_property(&self, node: NodeId, name: &str, value: &Value) {
        self.with_node_mut(node, |n| {
            match n.properties.iter_mut().find(|(key, _)| key == name) {
                Some((_, slot)) => *slot = value.clone(),
                None => n.properties.push((name.to_string(), value.clone())),
            }
        });
    }

    fn add_event_listener(&self, node: NodeId, event: &str, handler: EventHandler) {
        self.with_node_mut(node, |n| n.listeners.push((event.to_string(), handler)));
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        if let Some(previous) = self.parent(child) {
            self.remove_child(previous, child);
        }
        self.with_node_mut(parent, |n| n.children.push(child));
        self.set_parent(child, Some(parent));
    }

    fn replace_child(&self, parent: NodeId, new_child: NodeId, old_child: NodeId) {
        if let Some(previous) = self.parent(new_child) {
            self.remove_child(previous, new_child);
        }
        let replaced = self
            .with_node_mut(parent, |n| match n.children.iter_mut().find(|c| **c == old_child) {
                Some(slot) => {
                    *slot = new_child;
                    true
                }
                None => false,
            })
            .unwrap_or(false);

        if replaced {
            self.set_parent(old_child, None);
            self.set_parent(new_child, Some(parent));
        }
    }

    fn remove_child(&self, parent: NodeId, child: NodeId) {
        self.with_node_mut(parent, |n| n.children.retain(|c| *c != child));
        self.set_parent(child, None);
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.with_node(node, |n| n.parent).flatten()
    }
}
