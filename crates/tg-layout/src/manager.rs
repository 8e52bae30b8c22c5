// ABOUTME: Front door of the layout engine used by the host UI.
// ABOUTME: Owns the tree, tracks the active pane and its most-recently-used history.

use std::collections::HashMap;

use tg_core::{Config, Direction, DocumentRef, LayoutSettings, LayoutSnapshot, PaneId, TabId};

use crate::{
    ClosedPane, ClosedTab, LayoutError, LayoutEvent, LayoutTree, MruHistory, Outcome, Rect,
    RestoreError, Tab,
};

/// Which pane a command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneTarget {
    /// The active pane; on an empty layout a fresh root pane is created
    Active,
    Pane(PaneId),
}

impl From<PaneId> for PaneTarget {
    fn from(id: PaneId) -> Self {
        PaneTarget::Pane(id)
    }
}

/// Owns the layout and keeps `active` pointing at a live pane.
///
/// `active` is `None` only while the tree is empty. Every method either
/// completes and returns the events it caused, or fails with a not-found error
/// before touching anything.
#[derive(Debug, Clone)]
pub struct LayoutManager {
    tree: LayoutTree,
    active: Option<PaneId>,
    history: MruHistory,
    settings: LayoutSettings,
}

impl LayoutManager {
    /// Empty layout; the first `open_tab` on the active target creates the root pane
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            tree: LayoutTree::new(),
            active: None,
            history: MruHistory::new(settings.history_limit),
            settings,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.layout.clone())
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn active_pane(&self) -> Option<PaneId> {
        self.active
    }

    pub fn history(&self) -> &MruHistory {
        &self.history
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn panes_with_document(&self, document: &DocumentRef) -> Vec<PaneId> {
        self.tree.panes_with_document(document)
    }

    pub fn pane_rects(&self, bounds: Rect) -> HashMap<PaneId, Rect> {
        self.tree.pane_rects(bounds)
    }

    // --- tabs -----------------------------------------------------------

    /// Open `document` in the target pane, reusing and selecting an existing
    /// tab for the same document there
    pub fn open_tab(
        &mut self,
        target: impl Into<PaneTarget>,
        document: DocumentRef,
    ) -> Result<Outcome<TabId>, LayoutError> {
        let mut events = Vec::new();
        let pane = match (target.into(), self.active) {
            (PaneTarget::Pane(id), _) => id,
            (PaneTarget::Active, Some(id)) => id,
            (PaneTarget::Active, None) => self.ensure_root_pane(&mut events),
        };

        let opened = self.tree.open_tab(pane, document).map_err(rejected)?;
        if opened.created {
            events.push(LayoutEvent::TabOpened {
                pane,
                tab: opened.tab,
            });
        }
        events.push(LayoutEvent::TabSelected {
            pane,
            tab: opened.tab,
        });

        self.check_invariants();
        Ok(Outcome::new(opened.tab, events))
    }

    pub fn close_tab(&mut self, pane: PaneId, tab: TabId) -> Result<Outcome<()>, LayoutError> {
        let was_selected = self
            .tree
            .pane(pane)
            .and_then(|p| p.selected_tab())
            .is_some_and(|selected| selected.id() == tab);

        let closed = self.tree.close_tab(pane, tab).map_err(rejected)?;
        let mut events = Vec::new();
        self.tab_closed(pane, tab, was_selected, closed, &mut events);

        self.check_invariants();
        Ok(Outcome::new((), events))
    }

    pub fn select_tab(&mut self, pane: PaneId, tab: TabId) -> Result<Outcome<()>, LayoutError> {
        let previous = self
            .tree
            .pane(pane)
            .and_then(|p| p.selected_tab())
            .map(Tab::id);
        self.tree.select_tab(pane, tab).map_err(rejected)?;

        let events = if previous == Some(tab) {
            Vec::new()
        } else {
            vec![LayoutEvent::TabSelected { pane, tab }]
        };
        Ok(Outcome::new((), events))
    }

    pub fn set_tab_dirty(
        &mut self,
        pane: PaneId,
        tab: TabId,
        dirty: bool,
    ) -> Result<Outcome<()>, LayoutError> {
        let entry = self.tree.tab_mut(pane, tab).map_err(rejected)?;
        if entry.is_dirty() == dirty {
            return Ok(Outcome::new((), Vec::new()));
        }
        entry.set_dirty(dirty);
        Ok(Outcome::new((), vec![LayoutEvent::TabUpdated { pane, tab }]))
    }

    pub fn set_tab_title(
        &mut self,
        pane: PaneId,
        tab: TabId,
        title: impl Into<String>,
    ) -> Result<Outcome<()>, LayoutError> {
        let title = title.into();
        let entry = self.tree.tab_mut(pane, tab).map_err(rejected)?;
        if entry.title() == title {
            return Ok(Outcome::new((), Vec::new()));
        }
        entry.set_title(title);
        Ok(Outcome::new((), vec![LayoutEvent::TabUpdated { pane, tab }]))
    }

    /// Move a tab to another pane and focus that pane.
    ///
    /// If the destination already shows the document, its tab is selected
    /// instead and picks up the moved tab's dirty flag. A source pane left
    /// without tabs is closed.
    pub fn move_tab(
        &mut self,
        from: PaneId,
        tab: TabId,
        to: PaneId,
    ) -> Result<Outcome<TabId>, LayoutError> {
        let document = self
            .tree
            .pane(from)
            .ok_or(LayoutError::PaneNotFound(from))
            .and_then(|pane| {
                pane.tab(tab)
                    .map(|t| t.document().clone())
                    .ok_or(LayoutError::TabNotFound { pane: from, tab })
            })
            .map_err(rejected)?;
        if !self.tree.contains_pane(to) {
            return Err(rejected(LayoutError::PaneNotFound(to)));
        }

        let mut events = Vec::new();
        if from == to {
            events.extend(self.select_tab(from, tab)?.events);
            self.set_active(to, &mut events);
            return Ok(Outcome::new(tab, events));
        }

        let was_selected = self
            .tree
            .pane(from)
            .and_then(|p| p.selected_tab())
            .is_some_and(|selected| selected.id() == tab);
        let closed = self.tree.close_tab(from, tab)?;
        let moved = self.tab_closed(from, tab, was_selected, closed, &mut events);
        let moved_dirty = moved.is_dirty();

        let existing = self
            .tree
            .pane(to)
            .and_then(|pane| pane.find_document(&document))
            .map(Tab::id);
        let landed = match existing {
            Some(existing) => {
                self.tree.select_tab(to, existing)?;
                let entry = self.tree.tab_mut(to, existing)?;
                if moved_dirty && !entry.is_dirty() {
                    entry.set_dirty(true);
                    events.push(LayoutEvent::TabUpdated {
                        pane: to,
                        tab: existing,
                    });
                }
                existing
            }
            None => {
                let adopted = self.tree.adopt_tab(to, moved)?;
                events.push(LayoutEvent::TabOpened {
                    pane: to,
                    tab: adopted,
                });
                adopted
            }
        };
        events.push(LayoutEvent::TabSelected {
            pane: to,
            tab: landed,
        });
        self.set_active(to, &mut events);
        tracing::debug!("Moved tab {} from {} to {} as {}", tab, from, to, landed);

        self.check_invariants();
        Ok(Outcome::new(landed, events))
    }

    // --- structure ------------------------------------------------------

    /// Split `pane`, attaching a new empty pane on the `direction` side
    pub fn split_pane(
        &mut self,
        pane: PaneId,
        direction: Direction,
    ) -> Result<Outcome<PaneId>, LayoutError> {
        let added = self.tree.split(pane, direction).map_err(rejected)?;
        let mut events = vec![
            LayoutEvent::PaneAdded { pane: added },
            LayoutEvent::StructureChanged {
                subtree: self.tree.parent_of(added.into()),
            },
        ];
        if self.settings.focus_new_pane {
            self.set_active(added, &mut events);
        }
        tracing::debug!("Split pane {} {} into {}", pane, direction.label(), added);

        self.check_invariants();
        Ok(Outcome::new(added, events))
    }

    pub fn close_pane(&mut self, pane: PaneId) -> Result<Outcome<()>, LayoutError> {
        let closed = self.tree.close_pane(pane).map_err(rejected)?;
        let mut events = Vec::new();
        self.pane_removed(closed, &mut events);

        self.check_invariants();
        Ok(Outcome::new((), events))
    }

    /// Normalize the whole tree. Idempotent; the value says whether anything changed.
    pub fn flatten_all(&mut self) -> Outcome<bool> {
        let changed = self.tree.flatten_all();
        let events = if changed {
            vec![LayoutEvent::StructureChanged { subtree: None }]
        } else {
            Vec::new()
        };

        self.check_invariants();
        Outcome::new(changed, events)
    }

    // --- focus ----------------------------------------------------------

    pub fn focus_pane(&mut self, pane: PaneId) -> Result<Outcome<()>, LayoutError> {
        if !self.tree.contains_pane(pane) {
            return Err(rejected(LayoutError::PaneNotFound(pane)));
        }
        let mut events = Vec::new();
        self.set_active(pane, &mut events);
        Ok(Outcome::new((), events))
    }

    /// Focus the pane next to the active one. The value is the newly focused pane.
    pub fn focus_direction(&mut self, direction: Direction) -> Outcome<Option<PaneId>> {
        let Some(active) = self.active else {
            return Outcome::new(None, Vec::new());
        };
        let history = &self.history;
        let target = self
            .tree
            .neighbor(active, direction, |pane| history.recency(pane));

        let mut events = Vec::new();
        if let Some(target) = target {
            self.set_active(target, &mut events);
        }
        Outcome::new(target, events)
    }

    fn set_active(&mut self, pane: PaneId, events: &mut Vec<LayoutEvent>) {
        self.change_active(Some(pane), events);
    }

    fn change_active(&mut self, next: Option<PaneId>, events: &mut Vec<LayoutEvent>) {
        if let Some(pane) = next {
            self.history.touch(pane);
        }
        let previous = self.active;
        self.active = next;
        if previous != next {
            tracing::info!("Active pane {:?} -> {:?}", previous, next);
            events.push(LayoutEvent::ActivePaneChanged {
                previous,
                current: next,
            });
        }
    }

    fn ensure_root_pane(&mut self, events: &mut Vec<LayoutEvent>) -> PaneId {
        let pane = match self.tree.first_leaf() {
            Some(pane) => pane,
            None => {
                let pane = self.tree.insert_root_pane();
                events.push(LayoutEvent::PaneAdded { pane });
                events.push(LayoutEvent::StructureChanged { subtree: None });
                pane
            }
        };
        self.set_active(pane, events);
        pane
    }

    /// Events and focus bookkeeping for a closed tab; hands back the tab
    fn tab_closed(
        &mut self,
        pane: PaneId,
        tab: TabId,
        was_selected: bool,
        closed: ClosedTab,
        events: &mut Vec<LayoutEvent>,
    ) -> Tab {
        events.push(LayoutEvent::TabClosed { pane, tab });
        match closed.pane_removed {
            Some(removed) => self.pane_removed(removed, events),
            None => {
                if let Some(selected) = closed.selected.filter(|_| was_selected) {
                    events.push(LayoutEvent::TabSelected {
                        pane,
                        tab: selected,
                    });
                }
            }
        }
        closed.tab
    }

    /// Bookkeeping after a pane left the tree
    fn pane_removed(&mut self, closed: ClosedPane, events: &mut Vec<LayoutEvent>) {
        let pane = closed.pane.id();
        events.push(LayoutEvent::PaneRemoved { pane });
        events.push(LayoutEvent::StructureChanged {
            subtree: closed.affected,
        });

        self.history.remove(pane);
        if self.active == Some(pane) {
            let next = self.fallback_pane();
            self.change_active(next, events);
        }
    }

    /// Most recent live pane from history, else the leftmost leaf
    fn fallback_pane(&mut self) -> Option<PaneId> {
        while let Some(candidate) = self.history.pop_front() {
            if self.tree.contains_pane(candidate) {
                return Some(candidate);
            }
        }
        self.tree.first_leaf()
    }

    fn check_invariants(&self) {
        if self.settings.check_invariants {
            debug_assert_eq!(self.tree.validate(), Ok(()), "layout invariants broken");
            debug_assert!(
                match self.active {
                    Some(pane) => self.tree.contains_pane(pane),
                    None => self.tree.is_empty(),
                },
                "active pane {:?} is not in the layout",
                self.active
            );
        }
    }

    // --- persistence ----------------------------------------------------

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            root: self.tree.snapshot(),
            active: self.active,
            history: self.history.to_vec(),
        }
    }

    /// Rebuild a manager from a saved snapshot
    pub fn restore(
        snapshot: &LayoutSnapshot,
        settings: LayoutSettings,
    ) -> Result<Self, RestoreError> {
        let tree = match &snapshot.root {
            Some(root) => LayoutTree::from_snapshot(root)?,
            None => LayoutTree::new(),
        };
        let history = MruHistory::from_newest_first(
            snapshot
                .history
                .iter()
                .copied()
                .filter(|pane| tree.contains_pane(*pane)),
            settings.history_limit,
        );

        let mut manager = Self {
            tree,
            active: None,
            history,
            settings,
        };
        let mut events = Vec::new();
        let active = match snapshot.active.filter(|p| manager.tree.contains_pane(*p)) {
            Some(pane) => Some(pane),
            None => manager.fallback_pane(),
        };
        manager.change_active(active, &mut events);
        tracing::info!(
            "Restored layout with {} panes, active {:?}",
            manager.tree.pane_count(),
            manager.active
        );

        manager.check_invariants();
        Ok(manager)
    }
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

fn rejected(error: LayoutError) -> LayoutError {
    tracing::warn!("Rejected layout operation: {}", error);
    error
}
