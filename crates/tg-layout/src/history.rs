// ABOUTME: Most-recently-used history of panes.
// ABOUTME: Deduplicated recency list with an id index for cheap move-to-front.

use std::collections::{BTreeMap, HashMap};

use tg_core::PaneId;

/// Newest first. Each pane appears at most once.
///
/// Every touch stamps the pane with a fresh counter value; `order` sorts panes
/// by stamp and `stamps` finds a pane's current entry without scanning.
#[derive(Debug, Clone, Default)]
pub struct MruHistory {
    stamps: HashMap<PaneId, u64>,
    order: BTreeMap<u64, PaneId>,
    clock: u64,
    /// 0 = unbounded
    limit: usize,
}

impl MruHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Build from a newest-first list, keeping the first occurrence of each pane
    pub fn from_newest_first(panes: impl IntoIterator<Item = PaneId>, limit: usize) -> Self {
        let mut history = Self::new(limit);
        let panes: Vec<PaneId> = panes.into_iter().collect();
        for pane in panes.into_iter().rev() {
            history.touch(pane);
        }
        history
    }

    /// Move `pane` to the front, inserting it if absent
    pub fn touch(&mut self, pane: PaneId) {
        if let Some(old) = self.stamps.remove(&pane) {
            self.order.remove(&old);
        }
        self.clock += 1;
        self.stamps.insert(pane, self.clock);
        self.order.insert(self.clock, pane);

        while self.limit > 0 && self.order.len() > self.limit {
            if let Some((_, oldest)) = self.order.pop_first() {
                self.stamps.remove(&oldest);
            }
        }
    }

    pub fn remove(&mut self, pane: PaneId) -> bool {
        match self.stamps.remove(&pane) {
            Some(stamp) => {
                self.order.remove(&stamp);
                true
            }
            None => false,
        }
    }

    pub fn front(&self) -> Option<PaneId> {
        self.order.last_key_value().map(|(_, pane)| *pane)
    }

    pub fn pop_front(&mut self) -> Option<PaneId> {
        let (_, pane) = self.order.pop_last()?;
        self.stamps.remove(&pane);
        Some(pane)
    }

    /// Larger is more recent; `None` if the pane is not remembered
    pub fn recency(&self, pane: PaneId) -> Option<u64> {
        self.stamps.get(&pane).copied()
    }

    pub fn contains(&self, pane: PaneId) -> bool {
        self.stamps.contains_key(&pane)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = PaneId> + '_ {
        self.order.values().rev().copied()
    }

    pub fn to_vec(&self) -> Vec<PaneId> {
        self.iter().collect()
    }
}
