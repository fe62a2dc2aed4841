//! Context - Values provided to a subtree without prop threading.
//!
//! A provider pushes a [`ProviderFrame`] onto the runtime's scope stack while
//! its child materializes, and pops it afterwards. Consumers (and
//! [`Hooks::use_context`](super::Hooks::use_context)) read the topmost frame
//! for their context, falling back to the context default.
//!
//! Nested providers of the same context shadow the outer value only inside
//! their own subtree; a sibling provider never sees another sibling's value.
//! Every component instance snapshots the stack when it mounts, and the
//! snapshot is reinstalled whenever that instance re-renders on its own.
//!
//! # Example
//!
//! ```ignore
//! let theme = create_context("light".to_string());
//!
//! let tree = theme.provider("dark".to_string(),
//!     theme.consumer(|value| text(format!("theme: {value}"))),
//! );
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::primitives::{Component, Element, ElementKind, Node, Props};

static NEXT_CONTEXT_ID: AtomicUsize = AtomicUsize::new(0);

// =============================================================================
// Provider Frames
// =============================================================================

/// One provided value on the scope stack.
#[derive(Clone)]
pub struct ProviderFrame {
    context: usize,
    value: Rc<dyn Any>,
}

impl ProviderFrame {
    pub fn context_id(&self) -> usize {
        self.context
    }
}

impl fmt::Debug for ProviderFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderFrame")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Stack of provider frames active during a render pass.
#[derive(Default)]
pub(crate) struct ScopeStack {
    frames: RefCell<Vec<ProviderFrame>>,
}

impl ScopeStack {
    pub(crate) fn push(&self, frame: ProviderFrame) {
        self.frames.borrow_mut().push(frame);
    }

    pub(crate) fn pop(&self) {
        self.frames.borrow_mut().pop();
    }

    pub(crate) fn snapshot(&self) -> Vec<ProviderFrame> {
        self.frames.borrow().clone()
    }

    /// Install `frames`, returning the frames that were active.
    pub(crate) fn replace(&self, frames: Vec<ProviderFrame>) -> Vec<ProviderFrame> {
        std::mem::replace(&mut *self.frames.borrow_mut(), frames)
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Nearest provided value for `context`.
    pub(crate) fn lookup(&self, context: usize) -> Option<Rc<dyn Any>> {
        self.frames
            .borrow()
            .iter()
            .rev()
            .find(|frame| frame.context == context)
            .map(|frame| frame.value.clone())
    }
}

// =============================================================================
// Context
// =============================================================================

struct ContextInner<T> {
    id: usize,
    default: T,
}

/// Handle to a context. Clones refer to the same context.
pub struct Context<T> {
    inner: Rc<ContextInner<T>>,
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Create a context whose consumers read `default` when no provider is in scope.
pub fn create_context<T: Clone + 'static>(default: T) -> Context<T> {
    Context {
        inner: Rc::new(ContextInner {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            default,
        }),
    }
}

impl<T: Clone + 'static> Context<T> {
    pub fn id(&self) -> usize {
        self.inner.id
    }

    pub fn default_value(&self) -> T {
        self.inner.default.clone()
    }

    /// Descriptor rendering `child` with `value` provided.
    pub fn provider(&self, value: T, child: impl Into<Node>) -> Node {
        Element {
            kind: ElementKind::Provider(ProviderFrame {
                context: self.inner.id,
                value: Rc::new(value),
            }),
            props: Props::new(),
            children: vec![child.into()],
        }
        .into()
    }

    /// Descriptor calling `render` with the value in scope.
    pub fn consumer<F>(&self, render: F) -> Node
    where
        F: Fn(&T) -> Node + 'static,
    {
        let context = self.clone();
        Component::new("Consumer", move |hooks, _props| {
            let value = hooks.use_context(&context);
            render(&value)
        })
        .element(Props::new())
    }

    /// Resolve the value for this context against `scope`.
    pub(crate) fn resolve(&self, scope: &ScopeStack) -> T {
        scope
            .lookup(self.inner.id)
            .and_then(|value| value.downcast_ref::<T>().cloned())
            .unwrap_or_else(|| self.inner.default.clone())
    }
}
