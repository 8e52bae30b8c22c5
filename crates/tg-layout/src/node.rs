// ABOUTME: Internal nodes of the layout tree and references into the node arena.
// ABOUTME: Containers hold ordered children along one axis and their owner's id.

use tg_core::{Axis, ContainerId, PaneId};

/// A child slot: either a pane or a nested container, addressed by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Pane(PaneId),
    Container(ContainerId),
}

impl NodeRef {
    pub fn as_container(&self) -> Option<ContainerId> {
        match self {
            NodeRef::Container(id) => Some(*id),
            NodeRef::Pane(_) => None,
        }
    }
}

impl From<PaneId> for NodeRef {
    fn from(id: PaneId) -> Self {
        NodeRef::Pane(id)
    }
}

impl From<ContainerId> for NodeRef {
    fn from(id: ContainerId) -> Self {
        NodeRef::Container(id)
    }
}

#[derive(Debug, Clone)]
pub struct Container {
    id: ContainerId,
    axis: Axis,
    children: Vec<NodeRef>,
    parent: Option<ContainerId>,
}

impl Container {
    pub(crate) fn new(
        id: ContainerId,
        axis: Axis,
        children: Vec<NodeRef>,
        parent: Option<ContainerId>,
    ) -> Self {
        Self {
            id,
            axis,
            children,
            parent,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    pub fn index_of(&self, child: NodeRef) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeRef> {
        &mut self.children
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ContainerId>) {
        self.parent = parent;
    }
}
