//! Render error types.

use thiserror::Error;

use crate::engine::HookKind;
use crate::types::{InstanceId, NodeId};

// ============================================================================
// RenderError
// ============================================================================

/// Errors surfaced by the render coordinator.
///
/// Panics raised by component functions or effect bodies are not converted;
/// they unwind out of the call that started the render.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("hook #{index} in `{component}` changed kind: expected {expected}, found {found}")]
    HookKindChanged {
        component: String,
        index: usize,
        expected: HookKind,
        found: HookKind,
    },

    #[error("hook #{index} ({kind}) in `{component}` changed its value type")]
    HookTypeChanged {
        component: String,
        index: usize,
        kind: HookKind,
    },

    #[error("`{component}` called {found} hooks, previous render called {expected}")]
    HookCountChanged {
        component: String,
        expected: usize,
        found: usize,
    },

    #[error("host node {0} has no parent to replace it under")]
    Detached(NodeId),

    #[error("instance {0} is not mounted")]
    NotMounted(InstanceId),

    #[error("update loop: more than {0} deferred updates in one flush")]
    UpdateLoop(usize),
}

impl RenderError {
    /// True for errors caused by a component calling hooks in a different
    /// order, kind or number than on its previous render.
    pub fn is_hook_order_violation(&self) -> bool {
        matches!(
            self,
            Self::HookKindChanged { .. } | Self::HookTypeChanged { .. } | Self::HookCountChanged { .. }
        )
    }
}
