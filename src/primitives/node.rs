//! Descriptors - Immutable descriptions of nodes to materialize.
//!
//! A descriptor is either a text leaf or an element whose identity is a tag
//! name, a component function, or a context provider frame. Descriptors are
//! cheap to clone (`Rc`) and never validated.
//!
//! # Example
//!
//! ```ignore
//! use sea_ui::primitives::{h, text, Component, Props};
//!
//! let greeting = Component::new("Greeting", |_hooks, props| {
//!     h("p", Props::new(), [text(format!("Hello, {}", props.str("name").unwrap_or("you")))])
//! });
//!
//! let tree = h("div", Props::new().with("id", "app"), [
//!     greeting.element(Props::new().with("name", "sea")),
//!     text("!"),
//! ]);
//! ```

use std::fmt;
use std::rc::Rc;

use crate::engine::{Hooks, ProviderFrame};
use super::types::Props;

// =============================================================================
// Node
// =============================================================================

/// A descriptor node.
#[derive(Clone, Debug)]
pub enum Node {
    /// Text leaf.
    Text(String),
    /// Structured node.
    Element(Rc<Element>),
}

impl Node {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Text(_) => None,
            Self::Element(element) => Some(element),
        }
    }

    /// Tag name when this is a tag element.
    pub fn tag(&self) -> Option<&str> {
        match &self.as_element()?.kind {
            ElementKind::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(Rc::new(element))
    }
}

// =============================================================================
// Element
// =============================================================================

/// Structured descriptor: identity, properties, ordered children.
#[derive(Clone, Debug)]
pub struct Element {
    pub kind: ElementKind,
    pub props: Props,
    pub children: Vec<Node>,
}

/// What an element materializes as.
#[derive(Clone, Debug)]
pub enum ElementKind {
    /// Native host element.
    Tag(String),
    /// Component function, invoked with the element's props.
    Component(Component),
    /// Context provider; its single child renders with the frame in scope.
    Provider(ProviderFrame),
}

// =============================================================================
// Component
// =============================================================================

/// Signature of a component function.
///
/// The `Hooks` handle carries the instance's slot cursor for this render.
pub type RenderFn = dyn Fn(&mut Hooks<'_>, &Props) -> Node;

/// A named component function.
#[derive(Clone)]
pub struct Component {
    name: Rc<str>,
    render: Rc<RenderFn>,
}

impl Component {
    pub fn new<F>(name: &str, render: F) -> Self
    where
        F: Fn(&mut Hooks<'_>, &Props) -> Node + 'static,
    {
        Self {
            name: Rc::from(name),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptor invoking this component with `props`.
    pub fn element(&self, props: Props) -> Node {
        Element {
            kind: ElementKind::Component(self.clone()),
            props,
            children: Vec::new(),
        }
        .into()
    }

    /// Descriptor invoking this component with `props` and children.
    pub fn with_children<I>(&self, props: Props, children: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.element(props.with_children(children))
    }

    /// Same function identity.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }

    pub(crate) fn call(&self, hooks: &mut Hooks<'_>, props: &Props) -> Node {
        (self.render)(hooks, props)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Build a tag element with children.
pub fn h<I>(tag: &str, props: Props, children: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Element {
        kind: ElementKind::Tag(tag.to_string()),
        props,
        children: children.into_iter().map(Into::into).collect(),
    }
    .into()
}

/// Build a tag element without children.
pub fn tag(tag: &str, props: Props) -> Node {
    h(tag, props, Vec::<Node>::new())
}

/// Build a text leaf.
pub fn text(content: impl Into<String>) -> Node {
    Node::Text(content.into())
}
