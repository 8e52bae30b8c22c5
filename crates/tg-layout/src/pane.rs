// ABOUTME: A pane: the leaf of the layout tree holding an ordered tab strip.
// ABOUTME: Tracks the selected tab; its owning container is set only by the tree.

use tg_core::{ContainerId, DocumentRef, PaneId, TabId};

use crate::Tab;

#[derive(Debug, Clone)]
pub struct Pane {
    id: PaneId,
    tabs: Vec<Tab>,
    /// `None` exactly when `tabs` is empty
    selected: Option<usize>,
    parent: Option<ContainerId>,
}

impl Pane {
    pub(crate) fn new(id: PaneId, parent: Option<ContainerId>) -> Self {
        Self {
            id,
            tabs: Vec::new(),
            selected: None,
            parent,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    /// Owning container, `None` when this pane is the root
    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        self.selected.and_then(|i| self.tabs.get(i))
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id() == id)
    }

    pub fn position_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id() == id)
    }

    pub fn find_document(&self, document: &DocumentRef) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.document() == document)
    }

    pub(crate) fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.id() == id)
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ContainerId>) {
        self.parent = parent;
    }

    /// Append a tab and select it
    pub(crate) fn push(&mut self, tab: Tab) -> TabId {
        let id = tab.id();
        self.tabs.push(tab);
        self.selected = Some(self.tabs.len() - 1);
        id
    }

    /// Returns false if the tab is not in this pane
    pub(crate) fn select(&mut self, id: TabId) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Remove a tab. A removed selection moves to the left neighbor, else the right one.
    pub(crate) fn remove(&mut self, id: TabId) -> Option<Tab> {
        let index = self.position_of(id)?;
        let removed = self.tabs.remove(index);

        self.selected = match self.selected {
            _ if self.tabs.is_empty() => None,
            Some(selected) if selected == index => Some(index.saturating_sub(1)),
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };

        Some(removed)
    }

    /// Restore-time construction; the caller has already validated `selected`
    pub(crate) fn with_tabs(
        id: PaneId,
        tabs: Vec<Tab>,
        selected: Option<usize>,
        parent: Option<ContainerId>,
    ) -> Self {
        Self {
            id,
            tabs,
            selected,
            parent,
        }
    }
}
