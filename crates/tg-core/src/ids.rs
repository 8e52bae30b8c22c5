// ABOUTME: Stable identifiers for panes, containers and tabs.
// ABOUTME: Ids are never reused within one layout, so stale ids simply miss.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Monotonic id source shared by every node kind of one layout
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Largest id a restored layout may carry; the upper half stays free for new ids
    pub const RESTORE_LIMIT: u64 = u64::MAX >> 1;

    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Start handing out ids strictly above `floor`
    pub fn starting_after(floor: u64) -> Self {
        Self {
            next: floor.saturating_add(1),
        }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn pane(&mut self) -> PaneId {
        PaneId(self.bump())
    }

    pub fn container(&mut self) -> ContainerId {
        ContainerId(self.bump())
    }

    pub fn tab(&mut self) -> TabId {
        TabId(self.bump())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut ids = IdAllocator::new();
        let pane = ids.pane();
        let container = ids.container();
        let tab = ids.tab();
        assert_eq!(pane, PaneId(0));
        assert_eq!(container, ContainerId(1));
        assert_eq!(tab, TabId(2));
    }

    #[test]
    fn starting_after_skips_restored_ids() {
        let mut ids = IdAllocator::starting_after(41);
        assert_eq!(ids.pane(), PaneId(42));
    }

    #[test]
    fn display_uses_short_prefixes() {
        assert_eq!(PaneId(3).to_string(), "P3");
        assert_eq!(ContainerId(4).to_string(), "C4");
        assert_eq!(TabId(5).to_string(), "T5");
    }
}
