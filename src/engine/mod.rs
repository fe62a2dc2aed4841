//! Component engine - Instances, hook slots and context scopes.
//!
//! The engine manages the per-instance data behind component functions:
//! - Registry: Instance allocation, generations, parent context, teardown
//! - Instance: Component + props + hook slots + mounted host node
//! - Slots: Positional hook cells, validated on every render
//! - Hooks: The `use_*` API handed to component functions
//! - Context: Provider frames and the scope stack
//!
//! # Architecture
//!
//! Instances are addressed by generational ids into the registry:
//!
//! ```text
//! i0v0: App      (parent=-,    slots=[state, effect],  node=n1)
//! i1v0: Counter  (parent=i0v0, slots=[state, memo],    node=n4)
//! i2v3: Consumer (parent=i0v0, slots=[],               node=n7)
//! ```
//!
//! A setter captured by an old render carries its instance id, so once the
//! index is recycled (generation bumped) the stale setter is ignored.

mod context;
mod hooks;
pub(crate) mod instance;
pub(crate) mod registry;
mod slots;

pub use context::{create_context, Context, ProviderFrame};
pub use hooks::{Dispatch, Hooks, Ref, Setter};
pub use slots::HookKind;

pub(crate) use context::ScopeStack;
pub(crate) use hooks::Scheduler;
