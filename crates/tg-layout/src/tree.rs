// ABOUTME: Arena-backed n-ary tree of panes and containers.
// ABOUTME: Supports splitting, closing and flattening while keeping the tree normalized.

use std::collections::{HashMap, HashSet};

use tg_core::{
    ContainerId, Direction, DocumentRef, IdAllocator, NodeSnapshot, PaneId, Placement,
    TabId,
};

use crate::{
    Container, InvariantViolation, LayoutError, NodeRef, Pane, Rect, RestoreError, Tab,
};

/// Result of opening a document into a pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenedTab {
    pub tab: TabId,
    /// False when the pane already had a tab for the document
    pub created: bool,
}

/// Result of closing a tab
#[derive(Debug, Clone)]
pub struct ClosedTab {
    pub tab: Tab,
    /// Selection in the pane afterwards, if the pane survived
    pub selected: Option<TabId>,
    /// Set when the tab was the pane's last one and the pane went with it
    pub pane_removed: Option<ClosedPane>,
}

/// Result of closing a pane
#[derive(Debug, Clone)]
pub struct ClosedPane {
    pub pane: Pane,
    /// Nearest surviving ancestor of the removed pane, `None` when the change
    /// reached the root
    pub affected: Option<ContainerId>,
}

enum Collapse {
    Kept,
    Removed(Option<ContainerId>),
    Promoted(Option<ContainerId>),
}

/// The pane layout.
///
/// Nodes live in two id-keyed maps; every node records its owning container's
/// id. After every public mutation:
/// - every container has at least two children,
/// - no container has a child container on the same axis,
/// - every child's recorded owner is the container that lists it.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    root: Option<NodeRef>,
    panes: HashMap<PaneId, Pane>,
    containers: HashMap<ContainerId, Container>,
    ids: IdAllocator,
}

impl LayoutTree {
    /// An empty layout with no panes
    pub fn new() -> Self {
        Self::default()
    }

    /// A layout with one empty root pane
    pub fn with_root_pane() -> (Self, PaneId) {
        let mut tree = Self::new();
        let pane = tree.insert_root_pane();
        (tree, pane)
    }

    /// Add a root pane to an empty layout. Returns `None` if the layout has panes.
    pub fn create_root_pane(&mut self) -> Option<PaneId> {
        if self.root.is_some() {
            return None;
        }
        Some(self.insert_root_pane())
    }

    /// Caller guarantees the layout is empty
    pub(crate) fn insert_root_pane(&mut self) -> PaneId {
        debug_assert!(self.root.is_none(), "root pane inserted over {:?}", self.root);
        let pane = self.ids.pane();
        self.panes.insert(pane, Pane::new(pane, None));
        self.root = Some(NodeRef::Pane(pane));
        tracing::debug!("Created root pane {}", pane);
        pane
    }

    pub fn root(&self) -> Option<NodeRef> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(&id)
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn contains_pane(&self, id: PaneId) -> bool {
        self.panes.contains_key(&id)
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn parent_of(&self, node: NodeRef) -> Option<ContainerId> {
        match node {
            NodeRef::Pane(id) => self.panes.get(&id).and_then(Pane::parent),
            NodeRef::Container(id) => self.containers.get(&id).and_then(Container::parent),
        }
    }

    /// Owning containers from the closest upward
    pub fn ancestors(&self, node: NodeRef) -> Vec<ContainerId> {
        let mut out = Vec::new();
        let mut current = self.parent_of(node);
        while let Some(id) = current {
            out.push(id);
            current = self.parent_of(NodeRef::Container(id));
        }
        out
    }

    /// All pane ids in pre-order from the root
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.root
            .map(|root| self.leaves_under(root))
            .unwrap_or_default()
    }

    /// Leftmost leaf of a pre-order walk from the root
    pub fn first_leaf(&self) -> Option<PaneId> {
        let mut node = self.root?;
        loop {
            match node {
                NodeRef::Pane(id) => return Some(id),
                NodeRef::Container(id) => node = *self.containers[&id].children().first()?,
            }
        }
    }

    pub(crate) fn leaves_under(&self, node: NodeRef) -> Vec<PaneId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            match node {
                NodeRef::Pane(id) => out.push(id),
                NodeRef::Container(id) => {
                    stack.extend(self.containers[&id].children().iter().rev().copied());
                }
            }
        }
        out
    }

    /// Panes holding a tab for `document`, in pre-order
    pub fn panes_with_document(&self, document: &DocumentRef) -> Vec<PaneId> {
        self.pane_ids()
            .into_iter()
            .filter(|id| self.panes[id].find_document(document).is_some())
            .collect()
    }

    fn pane_or_err(&self, id: PaneId) -> Result<&Pane, LayoutError> {
        self.panes.get(&id).ok_or(LayoutError::PaneNotFound(id))
    }

    fn pane_mut(&mut self, id: PaneId) -> Result<&mut Pane, LayoutError> {
        self.panes.get_mut(&id).ok_or(LayoutError::PaneNotFound(id))
    }

    fn container_mut(&mut self, id: ContainerId) -> &mut Container {
        self.containers
            .get_mut(&id)
            .expect("containers referenced from the tree are stored in the arena")
    }

    fn set_parent(&mut self, node: NodeRef, parent: Option<ContainerId>) {
        match node {
            NodeRef::Pane(id) => {
                if let Some(pane) = self.panes.get_mut(&id) {
                    pane.set_parent(parent);
                }
            }
            NodeRef::Container(id) => self.container_mut(id).set_parent(parent),
        }
    }

    /// Put `new` in the slot `old` occupies under `parent` (or at the root)
    fn replace_in_parent(&mut self, old: NodeRef, new: NodeRef, parent: Option<ContainerId>) {
        match parent {
            Some(pid) => {
                let children = self.container_mut(pid).children_mut();
                if let Some(slot) = children.iter_mut().find(|c| **c == old) {
                    *slot = new;
                }
            }
            None => self.root = Some(new),
        }
    }

    // --- tabs -----------------------------------------------------------

    /// Open `document` in `pane`, or select the pane's existing tab for it
    pub fn open_tab(
        &mut self,
        pane: PaneId,
        document: DocumentRef,
    ) -> Result<OpenedTab, LayoutError> {
        let existing = self.pane_or_err(pane)?.find_document(&document).map(Tab::id);
        if let Some(tab) = existing {
            self.pane_mut(pane)?.select(tab);
            return Ok(OpenedTab {
                tab,
                created: false,
            });
        }

        let tab = Tab::new(self.ids.tab(), document);
        let tab = self.pane_mut(pane)?.push(tab);
        Ok(OpenedTab { tab, created: true })
    }

    pub fn select_tab(&mut self, pane: PaneId, tab: TabId) -> Result<(), LayoutError> {
        if self.pane_mut(pane)?.select(tab) {
            Ok(())
        } else {
            Err(LayoutError::TabNotFound { pane, tab })
        }
    }

    pub(crate) fn tab_mut(&mut self, pane: PaneId, tab: TabId) -> Result<&mut Tab, LayoutError> {
        self.pane_mut(pane)?
            .tab_mut(tab)
            .ok_or(LayoutError::TabNotFound { pane, tab })
    }

    /// Close a tab; a pane left without tabs is closed too
    pub fn close_tab(&mut self, pane: PaneId, tab: TabId) -> Result<ClosedTab, LayoutError> {
        let owner = self.pane_mut(pane)?;
        let removed = owner
            .remove(tab)
            .ok_or(LayoutError::TabNotFound { pane, tab })?;

        if owner.is_empty() {
            let closed = self.close_pane(pane)?;
            return Ok(ClosedTab {
                tab: removed,
                selected: None,
                pane_removed: Some(closed),
            });
        }

        Ok(ClosedTab {
            tab: removed,
            selected: owner.selected_tab().map(Tab::id),
            pane_removed: None,
        })
    }

    /// Append an existing tab (moved from another pane) and select it
    pub(crate) fn adopt_tab(&mut self, pane: PaneId, tab: Tab) -> Result<TabId, LayoutError> {
        Ok(self.pane_mut(pane)?.push(tab))
    }

    // --- structure ------------------------------------------------------

    /// Split `target`, placing a new empty pane on the `direction` side of it.
    ///
    /// Along the owning container's axis the new pane becomes a sibling;
    /// across it (or at the root) `target` is wrapped in a new container.
    pub fn split(&mut self, target: PaneId, direction: Direction) -> Result<PaneId, LayoutError> {
        let parent = self.pane_or_err(target)?.parent();
        let axis = direction.axis();
        let new_pane = self.ids.pane();

        match parent {
            Some(pid) if self.containers[&pid].axis() == axis => {
                let container = self.container_mut(pid);
                let index = container
                    .index_of(NodeRef::Pane(target))
                    .expect("a pane is listed by its owning container");
                let at = match direction.placement() {
                    Placement::Before => index,
                    Placement::After => index + 1,
                };
                container.children_mut().insert(at, NodeRef::Pane(new_pane));
                self.panes.insert(new_pane, Pane::new(new_pane, Some(pid)));
                tracing::debug!("Split {} {}: {} joins {}", target, direction.label(), new_pane, pid);
            }
            _ => {
                let wrapper = self.ids.container();
                let children = match direction.placement() {
                    Placement::Before => vec![NodeRef::Pane(new_pane), NodeRef::Pane(target)],
                    Placement::After => vec![NodeRef::Pane(target), NodeRef::Pane(new_pane)],
                };
                self.replace_in_parent(NodeRef::Pane(target), NodeRef::Container(wrapper), parent);
                self.containers
                    .insert(wrapper, Container::new(wrapper, axis, children, parent));
                self.set_parent(NodeRef::Pane(target), Some(wrapper));
                self.panes.insert(new_pane, Pane::new(new_pane, Some(wrapper)));
                tracing::debug!(
                    "Split {} {}: wrapped in {} {} with {}",
                    target,
                    direction.label(),
                    axis.label(),
                    wrapper,
                    new_pane
                );
            }
        }

        Ok(new_pane)
    }

    /// Remove a pane and its tabs, flattening whatever it leaves behind
    pub fn close_pane(&mut self, pane: PaneId) -> Result<ClosedPane, LayoutError> {
        let ancestors = self.ancestors(NodeRef::Pane(pane));
        let mut removed = self
            .panes
            .remove(&pane)
            .ok_or(LayoutError::PaneNotFound(pane))?;

        match removed.parent() {
            Some(pid) => {
                self.container_mut(pid)
                    .children_mut()
                    .retain(|c| *c != NodeRef::Pane(pane));
                self.flatten(pid);
            }
            None => self.root = None,
        }
        removed.set_parent(None);

        let affected = ancestors
            .into_iter()
            .find(|id| self.containers.contains_key(id));
        tracing::debug!("Closed pane {}, {} panes remain", pane, self.panes.len());

        Ok(ClosedPane {
            pane: removed,
            affected,
        })
    }

    /// Remove an empty container or promote the only child of a one-child container
    fn collapse(&mut self, id: ContainerId) -> Collapse {
        let (count, parent) = {
            let container = &self.containers[&id];
            (container.children().len(), container.parent())
        };

        match count {
            0 => {
                self.containers.remove(&id);
                match parent {
                    Some(pid) => self
                        .container_mut(pid)
                        .children_mut()
                        .retain(|c| *c != NodeRef::Container(id)),
                    None => self.root = None,
                }
                Collapse::Removed(parent)
            }
            1 => {
                let only = self.containers[&id].children()[0];
                self.containers.remove(&id);
                self.replace_in_parent(NodeRef::Container(id), only, parent);
                self.set_parent(only, parent);
                Collapse::Promoted(parent)
            }
            _ => Collapse::Kept,
        }
    }

    /// Splice same-axis child containers into `id`. Returns true if any were merged.
    fn merge_same_axis_children(&mut self, id: ContainerId) -> bool {
        let axis = self.containers[&id].axis();
        let mut merged = false;
        let mut i = 0;

        while i < self.containers[&id].children().len() {
            let child = self.containers[&id].children()[i];
            let absorbed = match child {
                NodeRef::Container(inner) if self.containers[&inner].axis() == axis => {
                    self.containers.remove(&inner)
                }
                _ => None,
            };
            match absorbed {
                Some(inner) => {
                    let grandchildren = inner.children().to_vec();
                    for grandchild in &grandchildren {
                        self.set_parent(*grandchild, Some(id));
                    }
                    self.container_mut(id)
                        .children_mut()
                        .splice(i..=i, grandchildren);
                    merged = true;
                }
                None => i += 1,
            }
        }

        merged
    }

    /// Restore the invariants starting at `id` and moving upward as far as needed
    fn flatten(&mut self, id: ContainerId) {
        let mut current = id;
        loop {
            match self.collapse(current) {
                Collapse::Removed(Some(parent)) => current = parent,
                Collapse::Removed(None) => return,
                Collapse::Promoted(parent) => {
                    if let Some(parent) = parent {
                        self.merge_same_axis_children(parent);
                    }
                    return;
                }
                Collapse::Kept => {
                    self.merge_same_axis_children(current);
                    return;
                }
            }
        }
    }

    /// Normalize the whole tree. Returns true if anything changed.
    pub fn flatten_all(&mut self) -> bool {
        match self.root {
            Some(NodeRef::Container(root)) => self.normalize(root),
            _ => false,
        }
    }

    /// Post-order: children first, then merge and collapse this container
    fn normalize(&mut self, id: ContainerId) -> bool {
        let mut changed = false;
        let children = self.containers[&id].children().to_vec();
        for child in children {
            if let NodeRef::Container(inner) = child {
                changed |= self.normalize(inner);
            }
        }
        changed |= self.merge_same_axis_children(id);
        if !matches!(self.collapse(id), Collapse::Kept) {
            changed = true;
        }
        changed
    }

    // --- checks ---------------------------------------------------------

    /// Check every structural invariant
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            let stored = self.panes.len() + self.containers.len();
            return if stored == 0 {
                Ok(())
            } else {
                Err(InvariantViolation::Unreachable(stored))
            };
        };

        if self.parent_of(root).is_some() {
            return Err(InvariantViolation::RootHasParent(root));
        }

        let mut seen: HashSet<NodeRef> = HashSet::new();
        let mut stack: Vec<(NodeRef, Option<ContainerId>)> = vec![(root, None)];

        while let Some((node, expected)) = stack.pop() {
            if !seen.insert(node) {
                return Err(InvariantViolation::Revisited(node));
            }
            let exists = match node {
                NodeRef::Pane(id) => self.panes.contains_key(&id),
                NodeRef::Container(id) => self.containers.contains_key(&id),
            };
            if !exists {
                return Err(InvariantViolation::DanglingChild {
                    parent: expected,
                    child: node,
                });
            }
            let recorded = self.parent_of(node);
            if recorded != expected {
                return Err(InvariantViolation::ParentMismatch {
                    node,
                    recorded,
                    actual: expected,
                });
            }

            match node {
                NodeRef::Pane(id) => check_pane(&self.panes[&id])?,
                NodeRef::Container(id) => {
                    let container = &self.containers[&id];
                    if container.children().len() < 2 {
                        return Err(InvariantViolation::DegenerateContainer {
                            container: id,
                            children: container.children().len(),
                        });
                    }
                    for child in container.children() {
                        if let NodeRef::Container(c) = child {
                            let same_axis = self
                                .containers
                                .get(c)
                                .is_some_and(|inner| inner.axis() == container.axis());
                            if same_axis {
                                return Err(InvariantViolation::RedundantNesting {
                                    parent: id,
                                    child: *c,
                                });
                            }
                        }
                        stack.push((*child, Some(id)));
                    }
                }
            }
        }

        let stored = self.panes.len() + self.containers.len();
        if seen.len() != stored {
            return Err(InvariantViolation::Unreachable(stored - seen.len()));
        }
        Ok(())
    }

    // --- snapshots ------------------------------------------------------

    pub fn snapshot(&self) -> Option<NodeSnapshot> {
        self.root.map(|root| self.snapshot_node(root))
    }

    fn snapshot_node(&self, node: NodeRef) -> NodeSnapshot {
        match node {
            NodeRef::Pane(id) => {
                let pane = &self.panes[&id];
                NodeSnapshot::Pane {
                    id,
                    tabs: pane.tabs().iter().map(Tab::to_snapshot).collect(),
                    selected: pane.selected_index(),
                }
            }
            NodeRef::Container(id) => {
                let container = &self.containers[&id];
                NodeSnapshot::Container {
                    id,
                    axis: container.axis(),
                    children: container
                        .children()
                        .iter()
                        .map(|child| self.snapshot_node(*child))
                        .collect(),
                }
            }
        }
    }

    /// Rebuild a tree from a snapshot.
    ///
    /// Panes without tabs are dropped and the result is normalized, so any
    /// snapshot with unique ids and valid selections yields a well-formed tree.
    pub fn from_snapshot(root: &NodeSnapshot) -> Result<Self, RestoreError> {
        let max_id = root.max_id();
        if max_id > IdAllocator::RESTORE_LIMIT {
            return Err(RestoreError::IdSpaceExhausted(max_id));
        }
        let mut tree = Self::new();
        let mut seen = HashSet::new();
        tree.root = tree.insert_snapshot(root, None, &mut seen)?;
        tree.flatten_all();
        tree.ids = IdAllocator::starting_after(max_id);
        Ok(tree)
    }

    fn insert_snapshot(
        &mut self,
        node: &NodeSnapshot,
        parent: Option<ContainerId>,
        seen: &mut HashSet<u64>,
    ) -> Result<Option<NodeRef>, RestoreError> {
        match node {
            NodeSnapshot::Pane { id, tabs, selected } => {
                claim(seen, id.0)?;
                for tab in tabs {
                    claim(seen, tab.id.0)?;
                }
                let mut documents = HashSet::new();
                for tab in tabs {
                    if !documents.insert(&tab.document) {
                        return Err(RestoreError::DuplicateDocument {
                            pane: *id,
                            document: tab.document.to_string(),
                        });
                    }
                }
                if tabs.is_empty() {
                    tracing::warn!("Dropping empty pane {} from restored layout", id);
                    return Ok(None);
                }
                let selected = match selected {
                    Some(index) if *index >= tabs.len() => {
                        return Err(RestoreError::SelectionOutOfRange {
                            pane: *id,
                            selected: *index,
                            tabs: tabs.len(),
                        });
                    }
                    Some(index) => *index,
                    None => 0,
                };
                let tabs = tabs.iter().map(Tab::from_snapshot).collect();
                self.panes
                    .insert(*id, Pane::with_tabs(*id, tabs, Some(selected), parent));
                Ok(Some(NodeRef::Pane(*id)))
            }
            NodeSnapshot::Container { id, axis, children } => {
                claim(seen, id.0)?;
                self.containers
                    .insert(*id, Container::new(*id, *axis, Vec::new(), parent));
                for child in children {
                    if let Some(child) = self.insert_snapshot(child, Some(*id), seen)? {
                        self.container_mut(*id).children_mut().push(child);
                    }
                }
                Ok(Some(NodeRef::Container(*id)))
            }
        }
    }

    // --- geometry -------------------------------------------------------

    /// Rectangle of every pane within `bounds`
    pub fn pane_rects(&self, bounds: Rect) -> HashMap<PaneId, Rect> {
        let mut result = HashMap::new();
        if let Some(root) = self.root {
            self.collect_rects(root, bounds, &mut result);
        }
        result
    }

    fn collect_rects(&self, node: NodeRef, rect: Rect, out: &mut HashMap<PaneId, Rect>) {
        match node {
            NodeRef::Pane(id) => {
                out.insert(id, rect);
            }
            NodeRef::Container(id) => {
                let container = &self.containers[&id];
                let parts = rect.split(container.axis(), container.children().len());
                for (child, part) in container.children().iter().zip(parts) {
                    self.collect_rects(*child, part, out);
                }
            }
        }
    }
}

fn claim(seen: &mut HashSet<u64>, id: u64) -> Result<(), RestoreError> {
    if seen.insert(id) {
        Ok(())
    } else {
        Err(RestoreError::DuplicateId(id))
    }
}

fn check_pane(pane: &Pane) -> Result<(), InvariantViolation> {
    let selection_ok = match pane.selected_index() {
        None => pane.is_empty(),
        Some(index) => index < pane.len(),
    };
    if !selection_ok {
        return Err(InvariantViolation::BadSelection {
            pane: pane.id(),
            selected: pane.selected_index(),
            tabs: pane.len(),
        });
    }

    let mut documents = HashSet::new();
    for tab in pane.tabs() {
        if !documents.insert(tab.document()) {
            return Err(InvariantViolation::DuplicateDocument {
                pane: pane.id(),
                document: tab.document().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_core::{Axis, TabSnapshot};

    fn doc(name: &str) -> DocumentRef {
        DocumentRef::file(name)
    }

    fn children(tree: &LayoutTree, id: ContainerId) -> Vec<NodeRef> {
        tree.container(id).unwrap().children().to_vec()
    }

    fn root_container(tree: &LayoutTree) -> ContainerId {
        tree.root().and_then(|r| r.as_container()).unwrap()
    }

    #[test]
    fn new_tree_is_empty() {
        let tree = LayoutTree::new();
        assert!(tree.is_empty());
        assert!(tree.pane_ids().is_empty());
        assert_eq!(tree.first_leaf(), None);
        tree.validate().unwrap();
    }

    #[test]
    fn split_root_pane_wraps_in_container() {
        let (mut tree, first) = LayoutTree::with_root_pane();
        let second = tree.split(first, Direction::Right).unwrap();

        let root = root_container(&tree);
        let container = tree.container(root).unwrap();
        assert_eq!(container.axis(), Axis::Row);
        assert_eq!(container.parent(), None);
        assert_eq!(
            children(&tree, root),
            vec![NodeRef::Pane(first), NodeRef::Pane(second)]
        );
        assert_eq!(tree.pane(first).unwrap().parent(), Some(root));
        assert_eq!(tree.pane(second).unwrap().parent(), Some(root));
        tree.validate().unwrap();
    }

    #[test]
    fn split_before_uses_lower_index() {
        let (mut tree, first) = LayoutTree::with_root_pane();
        let above = tree.split(first, Direction::Up).unwrap();

        let root = root_container(&tree);
        assert_eq!(tree.container(root).unwrap().axis(), Axis::Column);
        assert_eq!(
            children(&tree, root),
            vec![NodeRef::Pane(above), NodeRef::Pane(first)]
        );
    }

    #[test]
    fn same_axis_split_inserts_sibling() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Right).unwrap();
        let p2 = tree.split(p0, Direction::Right).unwrap();
        let p3 = tree.split(p1, Direction::Left).unwrap();

        let root = root_container(&tree);
        assert_eq!(tree.container_count(), 1);
        assert_eq!(
            children(&tree, root),
            vec![
                NodeRef::Pane(p0),
                NodeRef::Pane(p2),
                NodeRef::Pane(p3),
                NodeRef::Pane(p1)
            ]
        );
        tree.validate().unwrap();
    }

    #[test]
    fn orthogonal_split_nests_container() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Right).unwrap();
        let p2 = tree.split(p1, Direction::Down).unwrap();

        let root = root_container(&tree);
        let nested = children(&tree, root)[1].as_container().unwrap();
        assert_eq!(tree.container(nested).unwrap().axis(), Axis::Column);
        assert_eq!(tree.container(nested).unwrap().parent(), Some(root));
        assert_eq!(
            children(&tree, nested),
            vec![NodeRef::Pane(p1), NodeRef::Pane(p2)]
        );
        tree.validate().unwrap();
    }

    #[test]
    fn split_missing_pane_is_not_found() {
        let (mut tree, _) = LayoutTree::with_root_pane();
        assert_eq!(
            tree.split(PaneId(99), Direction::Right),
            Err(LayoutError::PaneNotFound(PaneId(99)))
        );
        assert_eq!(tree.pane_count(), 1);
    }

    #[test]
    fn close_pane_promotes_last_sibling_to_root() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Right).unwrap();

        let closed = tree.close_pane(p0).unwrap();
        assert_eq!(closed.pane.id(), p0);
        assert_eq!(closed.pane.parent(), None);
        assert_eq!(closed.affected, None);
        assert_eq!(tree.root(), Some(NodeRef::Pane(p1)));
        assert_eq!(tree.pane(p1).unwrap().parent(), None);
        assert_eq!(tree.container_count(), 0);
        tree.validate().unwrap();
    }

    #[test]
    fn close_middle_of_three_keeps_container() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Right).unwrap();
        let p2 = tree.split(p1, Direction::Right).unwrap();
        let root = root_container(&tree);

        let closed = tree.close_pane(p1).unwrap();
        assert_eq!(closed.affected, Some(root));
        assert_eq!(
            children(&tree, root),
            vec![NodeRef::Pane(p0), NodeRef::Pane(p2)]
        );
        tree.validate().unwrap();
    }

    #[test]
    fn closing_nested_pane_flattens_into_sibling() {
        // column [ row [p0, p0b], p1 ]
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Down).unwrap();
        let p0b = tree.split(p0, Direction::Right).unwrap();
        let column = root_container(&tree);
        assert_eq!(tree.container_count(), 2);

        tree.close_pane(p0b).unwrap();

        assert_eq!(tree.container_count(), 1);
        assert_eq!(
            children(&tree, column),
            vec![NodeRef::Pane(p0), NodeRef::Pane(p1)]
        );
        assert_eq!(tree.pane(p0).unwrap().parent(), Some(column));
        tree.validate().unwrap();
    }

    #[test]
    fn promoted_container_merges_into_same_axis_grandparent() {
        // row [ p0, column [ row [p2, p3], p1 ] ]
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p2 = tree.split(p0, Direction::Right).unwrap();
        let p1 = tree.split(p2, Direction::Down).unwrap();
        let p3 = tree.split(p2, Direction::Right).unwrap();
        let row = root_container(&tree);
        assert_eq!(tree.container_count(), 3);

        // Dropping p1 leaves the column with one child: the inner row, which
        // must be spliced into the outer row rather than nested inside it.
        tree.close_pane(p1).unwrap();

        assert_eq!(tree.container_count(), 1);
        assert_eq!(
            children(&tree, row),
            vec![NodeRef::Pane(p0), NodeRef::Pane(p2), NodeRef::Pane(p3)]
        );
        for pane in [p0, p2, p3] {
            assert_eq!(tree.pane(pane).unwrap().parent(), Some(row));
        }
        tree.validate().unwrap();
    }

    #[test]
    fn closing_root_pane_empties_tree() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        tree.close_pane(p0).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.pane_count(), 0);
        tree.validate().unwrap();

        assert!(tree.create_root_pane().is_some());
        assert!(tree.create_root_pane().is_none());
    }

    #[test]
    fn split_then_close_restores_shape() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Right).unwrap();
        tree.split(p1, Direction::Down).unwrap();
        tree.open_tab(p0, doc("a.rs")).unwrap();
        let before = tree.snapshot();

        for direction in Direction::all() {
            for pane in tree.pane_ids() {
                let added = tree.split(pane, *direction).unwrap();
                tree.close_pane(added).unwrap();
                assert_eq!(tree.snapshot(), before);
            }
        }
    }

    #[test]
    fn open_tab_is_idempotent() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let first = tree.open_tab(p0, doc("a.rs")).unwrap();
        tree.open_tab(p0, doc("b.rs")).unwrap();
        let again = tree.open_tab(p0, doc("a.rs")).unwrap();

        assert!(first.created);
        assert!(!again.created);
        assert_eq!(first.tab, again.tab);
        let pane = tree.pane(p0).unwrap();
        assert_eq!(pane.len(), 2);
        assert_eq!(pane.selected_tab().map(Tab::id), Some(first.tab));
    }

    #[test]
    fn same_document_in_two_panes_gets_two_tabs() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Right).unwrap();
        let a = tree.open_tab(p0, doc("a.rs")).unwrap();
        let b = tree.open_tab(p1, doc("a.rs")).unwrap();

        assert_ne!(a.tab, b.tab);
        assert_eq!(tree.panes_with_document(&doc("a.rs")), vec![p0, p1]);
    }

    #[test]
    fn closing_last_tab_closes_pane() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Right).unwrap();
        let tab = tree.open_tab(p1, doc("x.rs")).unwrap().tab;

        let closed = tree.close_tab(p1, tab).unwrap();
        assert_eq!(closed.tab.id(), tab);
        assert!(closed.pane_removed.is_some());
        assert!(!tree.contains_pane(p1));
        assert_eq!(tree.root(), Some(NodeRef::Pane(p0)));
    }

    #[test]
    fn close_missing_tab_changes_nothing() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        tree.open_tab(p0, doc("a.rs")).unwrap();
        let before = tree.snapshot();

        assert_eq!(
            tree.close_tab(p0, TabId(500)).unwrap_err(),
            LayoutError::TabNotFound {
                pane: p0,
                tab: TabId(500)
            }
        );
        assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn validate_reports_degenerate_container() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Right).unwrap();
        let root = root_container(&tree);

        // Bypass close_pane to leave a one-child container behind
        tree.panes.remove(&p1);
        tree.container_mut(root)
            .children_mut()
            .retain(|c| *c != NodeRef::Pane(p1));

        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::DegenerateContainer {
                container: root,
                children: 1
            })
        );
        assert!(tree.flatten_all());
        tree.validate().unwrap();
        assert_eq!(tree.root(), Some(NodeRef::Pane(p0)));
    }

    #[test]
    fn validate_reports_parent_mismatch() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        tree.split(p0, Direction::Right).unwrap();
        tree.panes.get_mut(&p0).unwrap().set_parent(None);

        assert!(matches!(
            tree.validate(),
            Err(InvariantViolation::ParentMismatch { .. })
        ));
    }

    #[test]
    fn flatten_all_is_idempotent_on_normal_tree() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Right).unwrap();
        tree.split(p1, Direction::Down).unwrap();
        let before = tree.snapshot();

        assert!(!tree.flatten_all());
        assert_eq!(tree.snapshot(), before);
    }

    fn tab_snapshot(id: u64, path: &str) -> TabSnapshot {
        TabSnapshot {
            id: TabId(id),
            document: doc(path),
            title: path.to_string(),
            icon: None,
            dirty: false,
        }
    }

    #[test]
    fn from_snapshot_normalizes_and_drops_empty_panes() {
        // row [ row [p1, p2], column [p3, empty p4] ]
        let snapshot = NodeSnapshot::Container {
            id: ContainerId(10),
            axis: Axis::Row,
            children: vec![
                NodeSnapshot::Container {
                    id: ContainerId(11),
                    axis: Axis::Row,
                    children: vec![
                        NodeSnapshot::Pane {
                            id: PaneId(1),
                            tabs: vec![tab_snapshot(20, "a")],
                            selected: Some(0),
                        },
                        NodeSnapshot::Pane {
                            id: PaneId(2),
                            tabs: vec![tab_snapshot(21, "b")],
                            selected: None,
                        },
                    ],
                },
                NodeSnapshot::Container {
                    id: ContainerId(12),
                    axis: Axis::Column,
                    children: vec![
                        NodeSnapshot::Pane {
                            id: PaneId(3),
                            tabs: vec![tab_snapshot(22, "c")],
                            selected: Some(0),
                        },
                        NodeSnapshot::Pane {
                            id: PaneId(4),
                            tabs: vec![],
                            selected: None,
                        },
                    ],
                },
            ],
        };

        let mut tree = LayoutTree::from_snapshot(&snapshot).unwrap();
        tree.validate().unwrap();
        assert_eq!(tree.pane_ids(), vec![PaneId(1), PaneId(2), PaneId(3)]);
        assert_eq!(
            children(&tree, ContainerId(10)),
            vec![
                NodeRef::Pane(PaneId(1)),
                NodeRef::Pane(PaneId(2)),
                NodeRef::Pane(PaneId(3))
            ]
        );
        assert_eq!(tree.pane(PaneId(2)).unwrap().selected_index(), Some(0));

        // Fresh ids never collide with restored ones
        let added = tree.split(PaneId(1), Direction::Down).unwrap();
        assert!(added.0 > 22);
    }

    #[test]
    fn from_snapshot_rejects_duplicate_ids() {
        let snapshot = NodeSnapshot::Container {
            id: ContainerId(1),
            axis: Axis::Row,
            children: vec![
                NodeSnapshot::Pane {
                    id: PaneId(2),
                    tabs: vec![tab_snapshot(3, "a")],
                    selected: Some(0),
                },
                NodeSnapshot::Pane {
                    id: PaneId(3),
                    tabs: vec![tab_snapshot(4, "b")],
                    selected: Some(0),
                },
            ],
        };
        assert_eq!(
            LayoutTree::from_snapshot(&snapshot).unwrap_err(),
            RestoreError::DuplicateId(3)
        );
    }

    #[test]
    fn from_snapshot_rejects_largest_id() {
        let snapshot = NodeSnapshot::Pane {
            id: PaneId(1),
            tabs: vec![tab_snapshot(u64::MAX, "a")],
            selected: Some(0),
        };
        assert_eq!(
            LayoutTree::from_snapshot(&snapshot).unwrap_err(),
            RestoreError::IdSpaceExhausted(u64::MAX)
        );

        let snapshot = NodeSnapshot::Pane {
            id: PaneId(IdAllocator::RESTORE_LIMIT + 1),
            tabs: vec![tab_snapshot(1, "a")],
            selected: Some(0),
        };
        assert!(matches!(
            LayoutTree::from_snapshot(&snapshot),
            Err(RestoreError::IdSpaceExhausted(_))
        ));

        let snapshot = NodeSnapshot::Pane {
            id: PaneId(1),
            tabs: vec![tab_snapshot(IdAllocator::RESTORE_LIMIT, "a")],
            selected: Some(0),
        };
        let mut tree = LayoutTree::from_snapshot(&snapshot).unwrap();
        let added = tree.split(PaneId(1), Direction::Right).unwrap();
        assert_eq!(added, PaneId(IdAllocator::RESTORE_LIMIT + 1));
        tree.validate().unwrap();
    }

    #[test]
    fn from_snapshot_rejects_bad_selection() {
        let snapshot = NodeSnapshot::Pane {
            id: PaneId(1),
            tabs: vec![tab_snapshot(2, "a")],
            selected: Some(3),
        };
        assert!(matches!(
            LayoutTree::from_snapshot(&snapshot),
            Err(RestoreError::SelectionOutOfRange { selected: 3, .. })
        ));
    }

    #[test]
    fn pane_rects_divide_evenly() {
        let (mut tree, p0) = LayoutTree::with_root_pane();
        let p1 = tree.split(p0, Direction::Right).unwrap();
        let p2 = tree.split(p1, Direction::Down).unwrap();

        let rects = tree.pane_rects(Rect::full());
        assert_eq!(rects.len(), 3);
        assert!((rects[&p0].width - 0.5).abs() < 0.001);
        assert!((rects[&p1].x - 0.5).abs() < 0.001);
        assert!((rects[&p1].height - 0.5).abs() < 0.001);
        assert!((rects[&p2].y - 0.5).abs() < 0.001);
    }
}
