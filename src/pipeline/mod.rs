//! Render Pipeline
//!
//! This module connects component descriptors to the host tree.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Descriptor → materialize → Host nodes
//!                  ↑
//! setter → Scheduler → update(instance) → Reconciler::diff → Reconciler::apply
//! ```
//!
//! ## Data Flow
//!
//! 1. **materialize** - Text, tag, component and provider descriptors become host nodes
//! 2. **update** - One instance re-renders; its old child instances are torn down
//! 3. **reconcile** - The new child descriptor replaces the old subtree in place
//!
//! ## Key Design Principles
//!
//! - **Host-agnostic**: Everything goes through the [`Host`] trait
//! - **Instance-local updates**: Siblings and ancestors keep their host nodes
//! - **Pluggable reconciliation**: [`Reconciler`] decides how a subtree changes

mod host;
mod memory;
pub mod mount;
mod reconcile;

pub use host::Host;
pub use memory::MemoryHost;
pub use mount::{mount, MountHandle, Runtime};
pub use reconcile::{Materializer, Patch, Reconciler, ReplaceSubtree};
