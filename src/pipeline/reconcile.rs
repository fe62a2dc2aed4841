//! Reconciliation - Turning one rendered descriptor into the next.
//!
//! An update computes a [`Patch`] between the previous and the new child
//! descriptor of an instance, then applies it to the instance's host root.
//! The only policy shipped is [`ReplaceSubtree`]: rebuild everything and
//! swap it in at the same position. Smarter policies plug in through
//! [`Reconciler`] without touching the hooks API.

use std::fmt;

use crate::error::RenderError;
use crate::primitives::Node;
use crate::types::NodeId;

/// Change computed by a [`Reconciler`].
#[derive(Clone, Debug)]
pub enum Patch {
    /// The host subtree already reflects the new descriptor.
    Keep,
    /// Build the descriptor from scratch and swap it in.
    Replace(Node),
}

impl Patch {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// Runtime capabilities a reconciler uses to apply a patch.
pub trait Materializer {
    /// Build host nodes for `node` (instantiating components) and return the root.
    fn materialize(&self, node: &Node) -> Result<NodeId, RenderError>;

    /// Swap `new` into the position of `old` under `old`'s parent.
    fn replace(&self, old: NodeId, new: NodeId) -> Result<(), RenderError>;
}

/// Reconciliation policy.
pub trait Reconciler {
    /// Patch turning `old` into `new`.
    fn diff(&self, old: &Node, new: &Node) -> Patch;

    /// Apply `patch` at `target`, returning the resulting root node.
    fn apply(&self, target: NodeId, patch: Patch, cx: &dyn Materializer) -> Result<NodeId, RenderError>;
}

/// Whole-subtree replacement: every update rebuilds the instance's subtree.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplaceSubtree;

impl Reconciler for ReplaceSubtree {
    fn diff(&self, _old: &Node, new: &Node) -> Patch {
        Patch::Replace(new.clone())
    }

    fn apply(&self, target: NodeId, patch: Patch, cx: &dyn Materializer) -> Result<NodeId, RenderError> {
        match patch {
            Patch::Keep => Ok(target),
            Patch::Replace(node) => {
                let fresh = cx.materialize(&node)?;
                cx.replace(target, fresh)?;
                Ok(fresh)
            }
        }
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => f.write_str("keep"),
            Self::Replace(_) => f.write_str("replace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::text;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl Materializer for Recorder {
        fn materialize(&self, node: &Node) -> Result<NodeId, RenderError> {
            self.calls
                .borrow_mut()
                .push(format!("materialize {}", node.as_text().unwrap_or("?")));
            Ok(NodeId::from_raw(9))
        }

        fn replace(&self, old: NodeId, new: NodeId) -> Result<(), RenderError> {
            self.calls.borrow_mut().push(format!("replace {old} -> {new}"));
            Ok(())
        }
    }

    #[test]
    fn test_replace_subtree_always_replaces() {
        let patch = ReplaceSubtree.diff(&text("a"), &text("a"));
        assert!(!patch.is_keep());
        assert_eq!(patch.to_string(), "replace");
    }

    #[test]
    fn test_apply_replace_materializes_then_swaps() {
        let recorder = Recorder::default();
        let target = NodeId::from_raw(1);

        let result = ReplaceSubtree.apply(target, Patch::Replace(text("b")), &recorder);

        assert_eq!(result, Ok(NodeId::from_raw(9)));
        assert_eq!(*recorder.calls.borrow(), ["materialize b", "replace n1 -> n9"]);
    }

    #[test]
    fn test_apply_keep_is_noop() {
        let recorder = Recorder::default();
        let target = NodeId::from_raw(4);

        assert_eq!(ReplaceSubtree.apply(target, Patch::Keep, &recorder), Ok(target));
        assert!(recorder.calls.borrow().is_empty());
    }
}
