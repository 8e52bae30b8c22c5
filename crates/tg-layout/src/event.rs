// ABOUTME: Change notifications returned from every layout mutation.
// ABOUTME: Hosts re-render only the panes and subtrees named in the events.

use tg_core::{ContainerId, PaneId, TabId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    TabOpened { pane: PaneId, tab: TabId },
    TabSelected { pane: PaneId, tab: TabId },
    TabClosed { pane: PaneId, tab: TabId },
    /// Title or dirty flag changed
    TabUpdated { pane: PaneId, tab: TabId },
    PaneAdded { pane: PaneId },
    PaneRemoved { pane: PaneId },
    /// Children changed below `subtree`; `None` means the whole tree
    StructureChanged { subtree: Option<ContainerId> },
    ActivePaneChanged {
        previous: Option<PaneId>,
        current: Option<PaneId>,
    },
}

impl LayoutEvent {
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            LayoutEvent::PaneAdded { .. }
                | LayoutEvent::PaneRemoved { .. }
                | LayoutEvent::StructureChanged { .. }
        )
    }
}

/// Value of a successful mutation plus what changed
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Outcome<T> {
    pub value: T,
    pub events: Vec<LayoutEvent>,
}

impl<T> Outcome<T> {
    pub fn new(value: T, events: Vec<LayoutEvent>) -> Self {
        Self { value, events }
    }

    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }

    pub fn changed_structure(&self) -> bool {
        self.events.iter().any(LayoutEvent::is_structural)
    }

    /// New active pane, if this change moved focus
    pub fn active_change(&self) -> Option<Option<PaneId>> {
        self.events.iter().rev().find_map(|event| match event {
            LayoutEvent::ActivePaneChanged { current, .. } => Some(*current),
            _ => None,
        })
    }
}
