//! Descriptor builder - Node descriptors and props.
//!
//! - [`h`] / [`tag`] - Tag elements
//! - [`text`] - Text leaves
//! - [`Component`] - Named component functions and their descriptors
//! - [`Props`] - Ordered property mapping (data values and `on*` handlers)
//!
//! Descriptors are plain immutable data: building one never touches the
//! host tree or any component state. Hand them to
//! [`Runtime::render`](crate::Runtime::render) to materialize.

mod node;
mod types;

pub use node::{h, tag, text, Component, Element, ElementKind, Node, RenderFn};
pub use types::{PropValue, Props};
