//! Instance Registry - Index allocation for component instances.
//!
//! Manages the lifecycle of instance slots:
//! - Index ↔ instance mapping with a generation per index
//! - Free index pool for O(1) reuse
//! - ReactiveSet of mounted instances (deriveds react to mount/unmount)
//! - Parent context stack for nested instance creation
//! - Destroy callbacks run when an instance is released
//!
//! The registry never runs user code itself. [`Registry::release`] detaches
//! instances and hands them back; the caller runs their teardown once the
//! registry borrow is gone.

use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::ReactiveSet;

use crate::types::{Cleanup, InstanceId};
use super::instance::Instance;

/// An instance detached from the registry, with its pending destroy callbacks.
pub(crate) struct Released {
    pub(crate) instance: Rc<Instance>,
    pub(crate) callbacks: Vec<Cleanup>,
}

impl Released {
    /// Run slot cleanups, then destroy callbacks in registration order.
    pub(crate) fn run(self) {
        self.instance.teardown();
        for callback in self.callbacks {
            callback();
        }
    }
}

pub(crate) struct Registry {
    /// Instance by index.
    entries: Vec<Option<Rc<Instance>>>,

    /// Current generation of each index.
    generations: Vec<u32>,

    /// Currently mounted instances.
    /// Using ReactiveSet so deriveds that iterate over this set
    /// automatically react when instances are added or removed.
    allocated: ReactiveSet<InstanceId>,

    /// Pool of freed indices for reuse.
    free: Vec<u32>,

    /// Stack of parent instances for nested component creation.
    parent_stack: Vec<InstanceId>,

    /// Destroy callbacks registered per instance.
    destroy_callbacks: HashMap<InstanceId, Vec<Cleanup>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            allocated: ReactiveSet::new(),
            free: Vec::new(),
            parent_stack: Vec::new(),
            destroy_callbacks: HashMap::new(),
        }
    }

    // =========================================================================
    // Parent Context Stack
    // =========================================================================

    /// Instance whose render is currently materializing children.
    pub(crate) fn current_parent(&self) -> Option<InstanceId> {
        self.parent_stack.last().copied()
    }

    pub(crate) fn push_parent(&mut self, id: InstanceId) {
        self.parent_stack.push(id);
    }

    pub(crate) fn pop_parent(&mut self) {
        self.parent_stack.pop();
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Reserve an id for a new instance, reusing a freed index when possible.
    pub(crate) fn allocate(&mut self) -> InstanceId {
        match self.free.pop() {
            Some(index) => InstanceId::new(index, self.generations[index as usize]),
            None => {
                let index = self.entries.len() as u32;
                self.entries.push(None);
                self.generations.push(0);
                InstanceId::new(index, 0)
            }
        }
    }

    /// Store the instance under its allocated id.
    pub(crate) fn insert(&mut self, instance: Rc<Instance>) {
        let id = instance.id;
        self.entries[id.index()] = Some(instance);
        self.allocated.insert(id);
    }

    /// Detach `id` and all of its descendants, children first.
    pub(crate) fn release(&mut self, id: InstanceId) -> Vec<Released> {
        let mut released = Vec::new();
        self.release_into(id, &mut released);
        released
    }

    /// Detach every descendant of `id`, keeping `id` itself.
    pub(crate) fn release_children(&mut self, id: InstanceId) -> Vec<Released> {
        let mut released = Vec::new();
        for child in self.children_of(id) {
            self.release_into(child, &mut released);
        }
        released
    }

    fn release_into(&mut self, id: InstanceId, released: &mut Vec<Released>) {
        let Some(instance) = self.get(id) else { return };

        // FIRST: release children (recursive!)
        for child in self.children_of(id) {
            self.release_into(child, released);
        }

        let index = id.index();
        self.entries[index] = None;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free.push(index as u32);
        self.allocated.remove(&id);

        let callbacks = self.destroy_callbacks.remove(&id).unwrap_or_default();
        released.push(Released { instance, callbacks });
    }

    // =========================================================================
    // Destroy Callbacks
    // =========================================================================

    /// Register a callback to run when the instance is released.
    pub(crate) fn on_destroy(&mut self, id: InstanceId, callback: Cleanup) {
        self.destroy_callbacks.entry(id).or_default().push(callback);
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub(crate) fn get(&self, id: InstanceId) -> Option<Rc<Instance>> {
        self.entries
            .get(id.index())?
            .as_ref()
            .filter(|instance| instance.id == id)
            .cloned()
    }

    pub(crate) fn is_allocated(&self, id: InstanceId) -> bool {
        self.allocated.contains(&id)
    }

    /// Direct children of `id`, in index order.
    pub(crate) fn children_of(&self, id: InstanceId) -> Vec<InstanceId> {
        self.entries
            .iter()
            .flatten()
            .filter(|instance| instance.parent == Some(id))
            .map(|instance| instance.id)
            .collect()
    }

    /// Instances without a parent instance.
    pub(crate) fn roots(&self) -> Vec<Rc<Instance>> {
        self.entries
            .iter()
            .flatten()
            .filter(|instance| instance.parent.is_none())
            .cloned()
            .collect()
    }

    /// All mounted instances.
    ///
    /// Note: This creates a reactive dependency when called from a derived/effect.
    pub(crate) fn allocated(&self) -> Vec<InstanceId> {
        self.allocated.iter()
    }

    pub(crate) fn allocated_count(&self) -> usize {
        self.allocated.len()
    }
}
