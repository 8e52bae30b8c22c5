// ABOUTME: Error types for layout operations, snapshot restore and invariant checks.
// ABOUTME: Only the not-found kind ever reaches callers of layout operations.

use tg_core::{ContainerId, PaneId, TabId};

use crate::NodeRef;

/// A referenced pane or tab does not exist. The failed call changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Pane not found: {0}")]
    PaneNotFound(PaneId),

    #[error("Tab {tab} not found in pane {pane}")]
    TabNotFound { pane: PaneId, tab: TabId },
}

impl LayoutError {
    /// Every layout error is a stale or unknown id
    pub fn is_not_found(&self) -> bool {
        match self {
            LayoutError::PaneNotFound(_) | LayoutError::TabNotFound { .. } => true,
        }
    }

    pub fn pane(&self) -> PaneId {
        match self {
            LayoutError::PaneNotFound(pane) | LayoutError::TabNotFound { pane, .. } => *pane,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RestoreError {
    #[error("Id {0} is used by more than one node or tab")]
    DuplicateId(u64),

    #[error("Pane {pane} selects tab {selected} but only has {tabs} tabs")]
    SelectionOutOfRange {
        pane: PaneId,
        selected: usize,
        tabs: usize,
    },

    #[error("Pane {pane} holds more than one tab for {document}")]
    DuplicateDocument { pane: PaneId, document: String },

    #[error("Id {0} leaves no room for new panes or tabs")]
    IdSpaceExhausted(u64),
}

/// Broken structural invariant. Seeing one means the engine has a bug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("Root {0:?} has an owning container")]
    RootHasParent(NodeRef),

    #[error("Container {container} has {children} children")]
    DegenerateContainer {
        container: ContainerId,
        children: usize,
    },

    #[error("Container {child} shares the axis of its parent {parent}")]
    RedundantNesting {
        parent: ContainerId,
        child: ContainerId,
    },

    #[error("{node:?} points at {recorded:?} but lives in {actual:?}")]
    ParentMismatch {
        node: NodeRef,
        recorded: Option<ContainerId>,
        actual: Option<ContainerId>,
    },

    #[error("{child:?} under {parent:?} is not stored in the arena")]
    DanglingChild {
        parent: Option<ContainerId>,
        child: NodeRef,
    },

    #[error("{0:?} is reachable more than once")]
    Revisited(NodeRef),

    #[error("{0} nodes are stored but not reachable from the root")]
    Unreachable(usize),

    #[error("Pane {pane} selection {selected:?} does not fit {tabs} tabs")]
    BadSelection {
        pane: PaneId,
        selected: Option<usize>,
        tabs: usize,
    },

    #[error("Pane {pane} holds more than one tab for {document}")]
    DuplicateDocument { pane: PaneId, document: String },
}
