//! Mount API - Runtime, materialization and instance updates.
//!
//! A [`Runtime`] renders descriptor trees into a [`Host`] and keeps the
//! component instances it created alive until they are discarded. State
//! changes re-render only the instance that owns the changed slot.
//!
//! # Example
//!
//! ```ignore
//! use sea_ui::pipeline::{mount, MemoryHost};
//!
//! let host = Rc::new(MemoryHost::new());
//! let container = host.container();
//!
//! let handle = mount(host.clone(), &app.element(Props::new()), container)?;
//! host.fire(host.find(container, "button").unwrap(), "click");
//!
//! // Tear down effects and subscriptions, detach the tree
//! handle.unmount();
//! ```
//!
//! # Update scheduling
//!
//! Outside a render, a setter re-renders its instance synchronously, one
//! render per call. During a render (an effect calling a setter, say) the
//! value is written at once but the re-render is queued; the queue drains in
//! order when the outermost render returns.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use tracing::{debug, error, trace, warn};

use crate::config::RuntimeConfig;
use crate::engine::instance::Instance;
use crate::engine::registry::{Registry, Released};
use crate::engine::{Hooks, ProviderFrame, Scheduler, ScopeStack};
use crate::error::RenderError;
use crate::primitives::{Component, Element, ElementKind, Node, PropValue};
use crate::types::{InstanceFlags, InstanceId, NodeId};
use super::host::{event_name, Host};
use super::reconcile::{Materializer, Patch, Reconciler, ReplaceSubtree};

// =============================================================================
// Render depth
// =============================================================================

/// Marks a render in progress for as long as it lives.
struct DepthGuard<'a>(&'a Cell<usize>);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

// =============================================================================
// Unwind guards
// =============================================================================
//
// A panicking component or effect unwinds through the render. These undo
// the bookkeeping of the frames it leaves so the runtime stays usable.

/// Pops the provider frame it pushed.
struct FrameGuard<'a>(&'a ScopeStack);

impl<'a> FrameGuard<'a> {
    fn enter(scope: &'a ScopeStack, frame: ProviderFrame) -> Self {
        scope.push(frame);
        Self(scope)
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.0.pop();
    }
}

/// Installs an instance's provider snapshot, restoring the outer frames on drop.
struct ScopeRestore<'a> {
    scope: &'a ScopeStack,
    outer: Option<Vec<ProviderFrame>>,
}

impl<'a> ScopeRestore<'a> {
    fn install(scope: &'a ScopeStack, frames: Vec<ProviderFrame>) -> Self {
        let outer = scope.replace(frames);
        Self {
            scope,
            outer: Some(outer),
        }
    }
}

impl Drop for ScopeRestore<'_> {
    fn drop(&mut self) {
        if let Some(outer) = self.outer.take() {
            self.scope.replace(outer);
        }
    }
}

/// Keeps `id` on the registry's parent stack while alive.
struct ParentGuard<'a>(&'a RefCell<Registry>);

impl<'a> ParentGuard<'a> {
    fn enter(registry: &'a RefCell<Registry>, id: InstanceId) -> Self {
        registry.borrow_mut().push_parent(id);
        Self(registry)
    }
}

impl Drop for ParentGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.0.try_borrow_mut() {
            registry.pop_parent();
        }
    }
}

/// Sets `RENDERING` on an instance while alive.
struct RenderingGuard<'a>(&'a Instance);

impl<'a> RenderingGuard<'a> {
    fn enter(instance: &'a Instance) -> Self {
        instance.insert_flag(InstanceFlags::RENDERING);
        Self(instance)
    }
}

impl Drop for RenderingGuard<'_> {
    fn drop(&mut self) {
        self.0.remove_flag(InstanceFlags::RENDERING);
    }
}

/// Releases an instance whose first render did not complete.
struct MountGuard<'a, H: Host + 'static> {
    runtime: &'a RuntimeInner<H>,
    id: InstanceId,
    armed: bool,
}

impl<H: Host + 'static> MountGuard<'_, H> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<H: Host + 'static> Drop for MountGuard<'_, H> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let released = match self.runtime.registry.try_borrow_mut() {
            Ok(mut registry) => registry.release(self.id),
            Err(_) => return,
        };
        trace!(instance = %self.id, "first render failed, releasing");
        self.runtime.run_released(released);
    }
}

// =============================================================================
// Mount records
// =============================================================================

/// One tree appended to a container by [`Runtime::render`].
struct MountRecord {
    /// Node returned to the caller.
    first: NodeId,
    /// Node currently in the container.
    current: Cell<NodeId>,
    /// Top-level instances of the tree.
    roots: Vec<InstanceId>,
}

// =============================================================================
// Runtime
// =============================================================================

struct RuntimeInner<H: Host + 'static> {
    this: Weak<RuntimeInner<H>>,
    host: Rc<H>,
    reconciler: Box<dyn Reconciler>,
    config: RuntimeConfig,
    registry: RefCell<Registry>,
    scope: ScopeStack,
    depth: Cell<usize>,
    pending: RefCell<VecDeque<InstanceId>>,
    errors: RefCell<Vec<RenderError>>,
    mounts: RefCell<Vec<MountRecord>>,
}

/// Component runtime bound to one host.
///
/// Clones share the same instances. Dropping the last clone tears down
/// every instance still alive.
pub struct Runtime<H: Host + 'static> {
    inner: Rc<RuntimeInner<H>>,
}

impl<H: Host + 'static> Clone for Runtime<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host + 'static> Runtime<H> {
    pub fn new(host: Rc<H>) -> Self {
        Self::with_config(host, RuntimeConfig::default())
    }

    pub fn with_config(host: Rc<H>, config: RuntimeConfig) -> Self {
        Self::with_reconciler(host, config, ReplaceSubtree)
    }

    /// Runtime applying updates through `reconciler`.
    pub fn with_reconciler<R>(host: Rc<H>, config: RuntimeConfig, reconciler: R) -> Self
    where
        R: Reconciler + 'static,
    {
        let inner = Rc::new_cyclic(|this| RuntimeInner {
            this: this.clone(),
            host,
            reconciler: Box::new(reconciler),
            config,
            registry: RefCell::new(Registry::new()),
            scope: ScopeStack::default(),
            depth: Cell::new(0),
            pending: RefCell::new(VecDeque::new()),
            errors: RefCell::new(Vec::new()),
            mounts: RefCell::new(Vec::new()),
        });
        Self { inner }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.inner.host
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Materialize `root`, append it to `container` and return its host node.
    ///
    /// Updates requested while rendering are applied before returning. The
    /// returned node keeps identifying the tree for [`Runtime::unmount`]
    /// after the root component re-renders onto a new node; see
    /// [`Runtime::mounted_node`] for the node currently in the container.
    pub fn render(&self, root: &Node, container: NodeId) -> Result<NodeId, RenderError> {
        self.render_root(root, container).map(|(node, _)| node)
    }

    /// Render `root` into `container` and return a handle that unmounts it.
    pub fn mount(&self, root: &Node, container: NodeId) -> Result<MountHandle<H>, RenderError> {
        let (node, root) = self.render_root(root, container)?;
        Ok(MountHandle {
            runtime: self.clone(),
            root,
            node,
            mounted: true,
        })
    }

    fn render_root(&self, root: &Node, container: NodeId) -> Result<(NodeId, Option<InstanceId>), RenderError> {
        let inner = &self.inner;
        let node = {
            let _depth = DepthGuard::enter(&inner.depth);
            let node = inner.materialize(root)?;
            inner.host.append_child(container, node);
            node
        };
        let instance = self.root_instance(node);
        let roots = inner
            .registry
            .borrow()
            .roots()
            .iter()
            .filter(|instance| instance.node.get().is_some_and(|n| inner.contains(node, n)))
            .map(|instance| instance.id)
            .collect();
        inner.mounts.borrow_mut().push(MountRecord {
            first: node,
            current: Cell::new(node),
            roots,
        });
        debug!(%node, %container, instances = inner.registry.borrow().allocated_count(), "rendered root");

        inner.flush()?;

        // Deferred updates may have replaced the root component's subtree.
        let node = instance.and_then(|id| self.instance_node(id)).unwrap_or(node);
        Ok((node, instance))
    }

    /// Re-render instance `id` now (or after the current render, if one is running).
    pub fn update(&self, id: InstanceId) -> Result<(), RenderError> {
        let inner = &self.inner;
        if inner.depth.get() > 0 {
            inner.pending.borrow_mut().push_back(id);
            return Ok(());
        }
        inner.update(id)?;
        inner.flush()
    }

    /// Tear down the instances of the tree rendered as `node` and detach it
    /// from its container.
    ///
    /// `node` is the value returned by [`Runtime::render`] or the tree's
    /// current root. Any other node is treated as a subtree: the top-level
    /// instances rendered under it are torn down and it is detached.
    pub fn unmount(&self, node: NodeId) {
        let inner = &self.inner;
        let record = {
            let mut mounts = inner.mounts.borrow_mut();
            mounts
                .iter()
                .position(|record| record.first == node || record.current.get() == node)
                .map(|index| mounts.remove(index))
        };
        let (node, roots) = match record {
            Some(record) => (record.current.get(), record.roots),
            None => {
                let roots = inner
                    .registry
                    .borrow()
                    .roots()
                    .iter()
                    .filter(|instance| instance.node.get().is_some_and(|n| inner.contains(node, n)))
                    .map(|instance| instance.id)
                    .collect();
                (node, roots)
            }
        };

        debug!(%node, roots = roots.len(), "unmount");
        {
            let _depth = DepthGuard::enter(&inner.depth);
            for id in roots {
                let released = inner.registry.borrow_mut().release(id);
                inner.run_released(released);
            }
            if let Some(parent) = inner.host.parent(node) {
                inner.host.remove_child(parent, node);
            }
        }

        if let Err(err) = inner.flush() {
            inner.record(err);
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// All live instances.
    pub fn mounted_instances(&self) -> Vec<InstanceId> {
        self.inner.registry.borrow().allocated()
    }

    pub fn instance_count(&self) -> usize {
        self.inner.registry.borrow().allocated_count()
    }

    /// Top-level instance whose subtree root is `node`.
    pub fn root_instance(&self, node: NodeId) -> Option<InstanceId> {
        self.inner
            .registry
            .borrow()
            .roots()
            .iter()
            .find(|instance| instance.node.get() == Some(node))
            .map(|instance| instance.id)
    }

    /// Node currently in the container for the tree rendered as `node`.
    pub fn mounted_node(&self, node: NodeId) -> Option<NodeId> {
        self.inner
            .mounts
            .borrow()
            .iter()
            .find(|record| record.first == node || record.current.get() == node)
            .map(|record| record.current.get())
    }

    /// Current host root of instance `id`.
    pub fn instance_node(&self, id: InstanceId) -> Option<NodeId> {
        self.inner.registry.borrow().get(id)?.node.get()
    }

    /// Live instances of components named `name`, in index order.
    pub fn find_instances(&self, name: &str) -> Vec<InstanceId> {
        let registry = self.inner.registry.borrow();
        let mut found: Vec<InstanceId> = registry
            .allocated()
            .into_iter()
            .filter(|id| registry.get(*id).is_some_and(|instance| instance.name() == name))
            .collect();
        found.sort_by_key(|id| id.index());
        found
    }

    /// Number of completed renders of instance `id`.
    pub fn render_count(&self, id: InstanceId) -> Option<u64> {
        Some(self.inner.registry.borrow().get(id)?.renders.get())
    }

    pub fn is_rendering(&self) -> bool {
        self.inner.depth.get() > 0
    }

    /// Errors from updates that had no caller to return them to.
    pub fn take_errors(&self) -> Vec<RenderError> {
        std::mem::take(&mut *self.inner.errors.borrow_mut())
    }

    /// Run `callback` when instance `id` is torn down. False if `id` is not live.
    pub fn on_destroy<F>(&self, id: InstanceId, callback: F) -> bool
    where
        F: FnOnce() + 'static,
    {
        let mut registry = self.inner.registry.borrow_mut();
        if !registry.is_allocated(id) {
            return false;
        }
        registry.on_destroy(id, Box::new(callback));
        true
    }
}

// =============================================================================
// Materialization & updates
// =============================================================================

impl<H: Host + 'static> RuntimeInner<H> {
    fn scheduler(&self) -> Weak<dyn Scheduler> {
        let this: Weak<dyn Scheduler> = self.this.clone();
        this
    }

    fn record(&self, err: RenderError) {
        error!(%err, "update failed");
        self.errors.borrow_mut().push(err);
    }

    fn run_released(&self, released: Vec<Released>) {
        for entry in released {
            trace!(instance = %entry.instance.id, component = entry.instance.name(), "teardown");
            entry.run();
        }
    }

    /// `node` is `ancestor` or lies under it.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.host.parent(n);
        }
        false
    }

    /// Invoke the component of `instance` with a fresh cursor.
    fn invoke(&self, instance: &Instance) -> Result<Node, RenderError> {
        let rendering = RenderingGuard::enter(instance);
        let mut hooks = Hooks::new(
            instance,
            self.scheduler(),
            &self.scope,
            self.config.validate_hook_order,
        );
        let child = instance.component.call(&mut hooks, &instance.props);
        drop(rendering);

        hooks.finish()?;
        instance.renders.set(instance.renders.get() + 1);
        trace!(instance = %instance.id, component = instance.name(), renders = instance.renders.get(), "rendered");
        Ok(child)
    }

    fn materialize_tag(&self, tag: &str, element: &Element) -> Result<NodeId, RenderError> {
        let node = self.host.create_element(tag);

        for (name, value) in element.props.iter() {
            match (value, event_name(name)) {
                (PropValue::Handler(handler), Some(event)) => {
                    self.host.add_event_listener(node, &event, handler.clone());
                }
                (PropValue::Value(value), None) => self.host.set_property(node, name, value),
                (PropValue::Handler(_), None) => {
                    warn!(tag, prop = name, "handler prop without `on` prefix ignored");
                }
                (PropValue::Value(_), Some(_)) => {
                    warn!(tag, prop = name, "event prop without a handler ignored");
                }
            }
        }

        for child in &element.children {
            let child = self.materialize(child)?;
            self.host.append_child(node, child);
        }
        Ok(node)
    }

    fn materialize_component(&self, component: &Component, element: &Element) -> Result<NodeId, RenderError> {
        let (id, parent) = {
            let mut registry = self.registry.borrow_mut();
            (registry.allocate(), registry.current_parent())
        };
        let instance = Rc::new(Instance::new(
            id,
            component.clone(),
            element.props.clone(),
            parent,
            self.scope.snapshot(),
        ));
        self.registry.borrow_mut().insert(instance.clone());
        trace!(instance = %id, component = component.name(), "mount");

        let guard = MountGuard {
            runtime: self,
            id,
            armed: true,
        };
        let node = self.render_instance(&instance)?;
        guard.disarm();
        instance.insert_flag(InstanceFlags::MOUNTED);
        Ok(node)
    }

    /// First render of a freshly inserted instance.
    fn render_instance(&self, instance: &Instance) -> Result<NodeId, RenderError> {
        let child = self.invoke(instance)?;

        let node = {
            let _parent = ParentGuard::enter(&self.registry, instance.id);
            self.materialize(&child)?
        };

        instance.node.set(Some(node));
        *instance.rendered.borrow_mut() = Some(child);
        Ok(node)
    }

    fn materialize_provider(&self, frame: &ProviderFrame, element: &Element) -> Result<NodeId, RenderError> {
        let _frame = FrameGuard::enter(&self.scope, frame.clone());
        match element.children.first() {
            Some(child) => self.materialize(child),
            None => Ok(self.host.create_text("")),
        }
    }

    /// Re-render one instance and swap its subtree in the host.
    fn update(&self, id: InstanceId) -> Result<(), RenderError> {
        let instance = self.registry.borrow().get(id);
        let Some(instance) = instance else {
            return Err(RenderError::NotMounted(id));
        };
        let Some(old) = instance.node.get() else {
            return Err(RenderError::NotMounted(id));
        };
        if self.host.parent(old).is_none() {
            return Err(RenderError::Detached(old));
        }

        let _depth = DepthGuard::enter(&self.depth);
        let _scope = ScopeRestore::install(&self.scope, instance.scope.clone());
        self.rerender(&instance, old)
    }

    fn rerender(&self, instance: &Instance, old: NodeId) -> Result<(), RenderError> {
        let child = self.invoke(instance)?;

        let previous = instance.rendered.borrow_mut().take();
        let patch = match &previous {
            Some(previous) => self.reconciler.diff(previous, &child),
            None => Patch::Replace(child.clone()),
        };
        trace!(instance = %instance.id, %patch, "update");

        if patch.is_keep() {
            *instance.rendered.borrow_mut() = Some(child);
            return Ok(());
        }

        let released = self.registry.borrow_mut().release_children(instance.id);
        self.run_released(released);

        let node = {
            let _parent = ParentGuard::enter(&self.registry, instance.id);
            self.reconciler.apply(old, patch, self)?
        };

        *instance.rendered.borrow_mut() = Some(child);
        self.retarget(instance, old, node);
        Ok(())
    }

    /// Point `instance`, and every ancestor whose root was `old`, at `new`.
    fn retarget(&self, instance: &Instance, old: NodeId, new: NodeId) {
        instance.node.set(Some(new));

        let mut parent = instance.parent;
        while let Some(id) = parent {
            let ancestor = self.registry.borrow().get(id);
            let Some(ancestor) = ancestor else { break };
            if ancestor.node.get() != Some(old) {
                break;
            }
            ancestor.node.set(Some(new));
            parent = ancestor.parent;
        }

        for record in self.mounts.borrow().iter() {
            if record.current.get() == old {
                record.current.set(new);
            }
        }
    }

    /// Drain queued updates, oldest first.
    fn flush(&self) -> Result<(), RenderError> {
        if self.depth.get() > 0 {
            return Ok(());
        }

        let mut passes = 0;
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(id) = next else {
                return Ok(());
            };

            passes += 1;
            if passes > self.config.max_update_passes {
                let dropped = self.pending.borrow().len() + 1;
                self.pending.borrow_mut().clear();
                warn!(dropped, "deferred updates dropped");
                return Err(RenderError::UpdateLoop(self.config.max_update_passes));
            }

            if !self.registry.borrow().is_allocated(id) {
                trace!(instance = %id, "deferred update for discarded instance dropped");
                continue;
            }
            if let Err(err) = self.update(id) {
                self.record(err);
            }
        }
    }
}

impl<H: Host + 'static> Scheduler for RuntimeInner<H> {
    fn request_update(&self, id: InstanceId) {
        if !self.registry.borrow().is_allocated(id) {
            trace!(instance = %id, "update for discarded instance ignored");
            return;
        }

        if self.depth.get() > 0 {
            trace!(instance = %id, "update deferred");
            self.pending.borrow_mut().push_back(id);
            return;
        }

        let result = self.update(id).and_then(|()| self.flush());
        if let Err(err) = result {
            self.record(err);
        }
    }
}

impl<H: Host + 'static> Materializer for RuntimeInner<H> {
    fn materialize(&self, node: &Node) -> Result<NodeId, RenderError> {
        match node {
            Node::Text(text) => Ok(self.host.create_text(text)),
            Node::Element(element) => match &element.kind {
                ElementKind::Tag(tag) => self.materialize_tag(tag, element),
                ElementKind::Component(component) => self.materialize_component(component, element),
                ElementKind::Provider(frame) => self.materialize_provider(frame, element),
            },
        }
    }

    fn replace(&self, old: NodeId, new: NodeId) -> Result<(), RenderError> {
        let parent = self.host.parent(old).ok_or(RenderError::Detached(old))?;
        self.host.replace_child(parent, new, old);
        Ok(())
    }
}

impl<H: Host + 'static> Drop for RuntimeInner<H> {
    fn drop(&mut self) {
        let released: Vec<Released> = {
            let mut registry = self.registry.borrow_mut();
            let roots = registry.roots();
            roots
                .iter()
                .flat_map(|instance| registry.release(instance.id))
                .collect()
        };
        if !released.is_empty() {
            debug!(instances = released.len(), "runtime dropped, tearing down");
        }
        self.run_released(released);
    }
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`]; unmounts on drop.
pub struct MountHandle<H: Host + 'static> {
    runtime: Runtime<H>,
    root: Option<InstanceId>,
    node: NodeId,
    mounted: bool,
}

impl<H: Host + 'static> MountHandle<H> {
    pub fn runtime(&self) -> &Runtime<H> {
        &self.runtime
    }

    /// Top-level instance, when the root descriptor is a component.
    pub fn root_instance(&self) -> Option<InstanceId> {
        self.root
    }

    /// Current host root of the mounted tree.
    ///
    /// Follows the root instance across its own re-renders.
    pub fn node(&self) -> NodeId {
        self.root
            .and_then(|id| self.runtime.instance_node(id))
            .unwrap_or(self.node)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Tear down every instance of the tree and detach it.
    pub fn unmount(mut self) {
        self.unmount_in_place();
    }

    fn unmount_in_place(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        let node = self.node();
        self.runtime.unmount(node);
    }
}

impl<H: Host + 'static> Drop for MountHandle<H> {
    fn drop(&mut self) {
        self.unmount_in_place();
    }
}

/// Create a runtime for `host` and mount `root` into `container`.
pub fn mount<H: Host + 'static>(host: Rc<H>, root: &Node, container: NodeId) -> Result<MountHandle<H>, RenderError> {
    Runtime::new(host).mount(root, container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::MemoryHost;
    use crate::primitives::{h, text, Props};
    use std::cell::Cell;

    fn setup() -> (Rc<MemoryHost>, NodeId, Runtime<MemoryHost>) {
        let host = Rc::new(MemoryHost::new());
        let container = host.container();
        let runtime = Runtime::new(host.clone());
        (host, container, runtime)
    }

    #[test]
    fn test_depth_guard() {
        let depth = Cell::new(0);
        {
            let _outer = DepthGuard::enter(&depth);
            let _inner = DepthGuard::enter(&depth);
            assert_eq!(depth.get(), 2);
        }
        assert_eq!(depth.get(), 0);
    }

    #[test]
    fn test_render_text_root() {
        let (host, container, runtime) = setup();

        let node = runtime.render(&text("plain"), container).unwrap();

        assert_eq!(host.children(container), vec![node]);
        assert_eq!(host.text(node).as_deref(), Some("plain"));
        assert_eq!(runtime.instance_count(), 0);
    }

    #[test]
    fn test_update_unknown_instance() {
        let (_host, _container, runtime) = setup();
        let id = InstanceId::new(3, 0);
        assert_eq!(runtime.update(id), Err(RenderError::NotMounted(id)));
    }

    #[test]
    fn test_mount_handle_unmounts_on_drop() {
        let (host, container, runtime) = setup();
        let app = Component::new("App", |_hooks, _props| h("main", Props::new(), ["hi"]));

        {
            let handle = runtime.mount(&app.element(Props::new()), container).unwrap();
            assert!(handle.is_mounted());
            assert_eq!(handle.root_instance(), runtime.find_instances("App").first().copied());
            assert_eq!(runtime.instance_count(), 1);
        }

        assert_eq!(runtime.instance_count(), 0);
        assert!(host.children(container).is_empty());
    }

    #[test]
    fn test_on_destroy_runs_at_unmount() {
        let (_host, container, runtime) = setup();
        let app = Component::new("App", |_hooks, _props| text("x"));
        let node = runtime.render(&app.element(Props::new()), container).unwrap();
        let id = runtime.root_instance(node).unwrap();

        let destroyed = Rc::new(Cell::new(false));
        let destroyed_clone = destroyed.clone();
        assert!(runtime.on_destroy(id, move || destroyed_clone.set(true)));

        runtime.unmount(node);

        assert!(destroyed.get());
        assert!(!runtime.on_destroy(id, || {}));
    }
}
