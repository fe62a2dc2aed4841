//! Component instance - One materialized invocation of a component.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::primitives::{Component, Node, Props};
use crate::types::{InstanceFlags, InstanceId, NodeId};
use super::context::ProviderFrame;
use super::slots::HookCell;

/// Per-instance state owned by the registry.
pub(crate) struct Instance {
    pub(crate) id: InstanceId,
    pub(crate) component: Component,
    pub(crate) props: Props,
    pub(crate) parent: Option<InstanceId>,
    /// Provider frames in scope when the instance mounted.
    pub(crate) scope: Vec<ProviderFrame>,
    pub(crate) slots: RefCell<Vec<Rc<HookCell>>>,
    /// Root host node of the instance's current subtree.
    pub(crate) node: Cell<Option<NodeId>>,
    /// Child descriptor produced by the last successful render.
    pub(crate) rendered: RefCell<Option<Node>>,
    pub(crate) flags: Cell<InstanceFlags>,
    pub(crate) renders: Cell<u64>,
}

impl Instance {
    pub(crate) fn new(
        id: InstanceId,
        component: Component,
        props: Props,
        parent: Option<InstanceId>,
        scope: Vec<ProviderFrame>,
    ) -> Self {
        Self {
            id,
            component,
            props,
            parent,
            scope,
            slots: RefCell::new(Vec::new()),
            node: Cell::new(None),
            rendered: RefCell::new(None),
            flags: Cell::new(InstanceFlags::NONE),
            renders: Cell::new(0),
        }
    }

    pub(crate) fn name(&self) -> &str {
        self.component.name()
    }

    pub(crate) fn has(&self, flag: InstanceFlags) -> bool {
        self.flags.get().contains(flag)
    }

    pub(crate) fn insert_flag(&self, flag: InstanceFlags) {
        self.flags.set(self.flags.get() | flag);
    }

    pub(crate) fn remove_flag(&self, flag: InstanceFlags) {
        let mut flags = self.flags.get();
        flags.remove(flag);
        self.flags.set(flags);
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Run every pending slot cleanup (effect cleanups, unsubscribes) in
    /// slot order and mark the instance destroyed.
    pub(crate) fn teardown(&self) {
        self.insert_flag(InstanceFlags::DESTROYED);
        self.remove_flag(InstanceFlags::MOUNTED);

        let slots: Vec<Rc<HookCell>> = self.slots.borrow().clone();
        for slot in slots {
            slot.run_cleanup();
        }
    }
}
