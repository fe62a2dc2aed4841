//! # sea-ui
//!
//! Hook-based component runtime over a non-diffing virtual tree.
//!
//! Components are plain functions of `(&mut Hooks, &Props) -> Node`. The
//! runtime invokes them, materializes the descriptors they return into a
//! host tree, and re-renders a single instance whenever one of its state
//! slots changes.
//!
//! ## Architecture
//!
//! ```text
//! h()/text()/Component::element → Runtime::render → materialize → Host
//!                                        ↑
//!          Setter / Dispatch / Signal → Scheduler → update(instance)
//! ```
//!
//! - Hook state is positional. Every instance owns an ordered list of slots
//!   and each render walks it with an explicit cursor carried by [`Hooks`].
//!   Calling hooks in a different order fails the render instead of
//!   misaligning state.
//! - Effects run inline while the component renders; setters called from
//!   them are applied once the render pass is over.
//! - An update rebuilds the instance's whole subtree and swaps it in at the
//!   same position, leaving siblings untouched.
//!
//! ## Modules
//!
//! - [`types`] - Node/instance handles, events, cleanups
//! - [`primitives`] - Descriptors, props, components
//! - [`engine`] - Hooks, slots, instances, context
//! - [`state`] - Signals, stores, reducer stores
//! - [`pipeline`] - Host trait, runtime, reconciliation, in-memory host
//! - [`renderer`] - Terminal outline of a host tree
//! - [`helpers`] - Router, forms, persisted state, `use_previous`, `use_store_state`
//!
//! ## Example
//!
//! ```ignore
//! use sea_ui::*;
//!
//! let counter = Component::new("Counter", |hooks, _props| {
//!     let (count, set_count) = hooks.use_state(0);
//!     h("button", Props::new().handler("onClick", move |_| set_count.set(count + 1)), [
//!         text(format!("clicked {count} times")),
//!     ])
//! });
//!
//! let host = Rc::new(MemoryHost::new());
//! let container = host.container();
//! let handle = mount(host.clone(), &counter.element(Props::new()), container)?;
//!
//! host.fire(handle.node(), "click");
//! assert_eq!(host.text_content(container), "clicked 1 times");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::RuntimeConfig;
pub use error::RenderError;

pub use engine::{create_context, Context, Dispatch, HookKind, Hooks, Ref, Setter};

pub use primitives::{h, tag, text, Component, Element, ElementKind, Node, PropValue, Props};

pub use state::{
    create_reducer_store, create_signal, create_store, Merge, ReducerStore, Signal, Store,
};

pub use pipeline::{
    mount, Host, Materializer, MemoryHost, MountHandle, Patch, Reconciler, ReplaceSubtree, Runtime,
};

pub use renderer::{print_tree, write_tree, TreeStyle};

pub use helpers::{
    use_form, use_persisted, use_previous, use_store_state, Form, FormOptions, MemoryStorage, Router, Storage,
};
