//! Primitive types - Props and prop values.
//!
//! Props are an ordered list of named values. A value is either plain data
//! (a `serde_json::Value`, assigned onto the host node) or an event handler
//! (registered as a listener when the name starts with `on`).

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::types::{Event, EventHandler};
use super::node::Node;

// =============================================================================
// Prop Value
// =============================================================================

/// A single property value.
#[derive(Clone)]
pub enum PropValue {
    /// Data assigned directly onto the host node.
    Value(Value),
    /// Listener for an `on*` property.
    Handler(EventHandler),
}

impl PropValue {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Handler(_) => None,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            Self::Value(_) => None,
            Self::Handler(h) => Some(h),
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Handler(_) => f.write_str("<handler>"),
        }
    }
}

impl From<Value> for PropValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(handler: EventHandler) -> Self {
        Self::Handler(handler)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Ordered property mapping of a descriptor.
///
/// Component descriptors also carry their children here, since a component
/// receives nothing but its props.
#[derive(Clone, Default, Debug)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
    children: Vec<Node>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a data property.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, PropValue::Value(value.into()));
        self
    }

    /// Add an event handler property, e.g. `handler("onClick", ...)`.
    pub fn handler<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Event) + 'static,
    {
        self.set(name, PropValue::Handler(Rc::new(handler)));
        self
    }

    /// Attach children (used by component descriptors).
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Insert or replace a property, keeping its original position on replace.
    pub fn set(&mut self, name: impl Into<String>, value: PropValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(PropValue::as_value)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    pub fn i64(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(Value::as_i64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(Value::as_bool)
    }

    pub fn event_handler(&self, name: &str) -> Option<&EventHandler> {
        self.get(name).and_then(PropValue::as_handler)
    }

    /// Properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}
