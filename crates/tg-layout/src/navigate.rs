// ABOUTME: Directional focus movement between panes.
// ABOUTME: Finds the pane adjacent to another one by walking the container tree.

use tg_core::{Direction, PaneId, Placement};

use crate::{LayoutTree, NodeRef};

impl LayoutTree {
    /// Pane next to `from` on the `direction` side, if there is one.
    ///
    /// Walks up to the closest container on the direction's axis that has a
    /// sibling on that side, then descends into the sibling. Containers on the
    /// same axis are entered at the edge facing `from`; across the axis the
    /// child holding the most recent pane by `recency` wins, the first child on
    /// ties or when nothing there is remembered.
    pub fn neighbor<F>(&self, from: PaneId, direction: Direction, recency: F) -> Option<PaneId>
    where
        F: Fn(PaneId) -> Option<u64>,
    {
        let axis = direction.axis();
        let mut node = NodeRef::Pane(from);

        while let Some(pid) = self.parent_of(node) {
            let container = self.container(pid)?;
            if container.axis() == axis {
                let index = container.index_of(node)?;
                let sibling = match direction.placement() {
                    Placement::Before => index.checked_sub(1),
                    Placement::After => Some(index + 1).filter(|i| *i < container.children().len()),
                };
                if let Some(sibling) = sibling {
                    return self.descend(container.children()[sibling], direction, &recency);
                }
            }
            node = NodeRef::Container(pid);
        }

        None
    }

    fn descend<F>(&self, mut node: NodeRef, direction: Direction, recency: &F) -> Option<PaneId>
    where
        F: Fn(PaneId) -> Option<u64>,
    {
        loop {
            let id = match node {
                NodeRef::Pane(id) => return Some(id),
                NodeRef::Container(id) => id,
            };
            let container = self.container(id)?;
            let children = container.children();
            let (first, last) = (*children.first()?, *children.last()?);

            node = if container.axis() == direction.axis() {
                match direction.placement() {
                    Placement::After => first,
                    Placement::Before => last,
                }
            } else {
                let mut best = first;
                let mut best_rank = self.best_recency(best, recency);
                for child in &children[1..] {
                    let rank = self.best_recency(*child, recency);
                    if rank > best_rank {
                        best = *child;
                        best_rank = rank;
                    }
                }
                best
            };
        }
    }

    fn best_recency<F>(&self, node: NodeRef, recency: &F) -> Option<u64>
    where
        F: Fn(PaneId) -> Option<u64>,
    {
        self.leaves_under(node).into_iter().filter_map(recency).max()
    }
}
