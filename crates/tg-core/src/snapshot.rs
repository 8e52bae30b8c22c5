// ABOUTME: Plain, owned copy of a layout tree for renderers and persistence.
// ABOUTME: Nodes carry stable ids so listeners can match them across snapshots.

use serde::{Deserialize, Serialize};

use crate::{Axis, ContainerId, DocumentRef, PaneId, TabId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub id: TabId,
    pub document: DocumentRef,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSnapshot {
    Container {
        id: ContainerId,
        axis: Axis,
        children: Vec<NodeSnapshot>,
    },
    Pane {
        id: PaneId,
        tabs: Vec<TabSnapshot>,
        #[serde(default)]
        selected: Option<usize>,
    },
}

impl NodeSnapshot {
    /// Pane ids in pre-order
    pub fn pane_ids(&self) -> Vec<PaneId> {
        let mut out = Vec::new();
        collect_pane_ids(self, &mut out);
        out
    }

    /// Largest raw id used by any node or tab in this subtree
    pub fn max_id(&self) -> u64 {
        match self {
            NodeSnapshot::Container { id, children, .. } => children
                .iter()
                .map(NodeSnapshot::max_id)
                .fold(id.0, u64::max),
            NodeSnapshot::Pane { id, tabs, .. } => {
                tabs.iter().map(|tab| tab.id.0).fold(id.0, u64::max)
            }
        }
    }
}

fn collect_pane_ids(node: &NodeSnapshot, out: &mut Vec<PaneId>) {
    match node {
        NodeSnapshot::Pane { id, .. } => out.push(*id),
        NodeSnapshot::Container { children, .. } => {
            for child in children {
                collect_pane_ids(child, out);
            }
        }
    }
}

/// Whole-layout snapshot: the tree plus focus bookkeeping
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub root: Option<NodeSnapshot>,
    #[serde(default)]
    pub active: Option<PaneId>,
    /// Most recently used first
    #[serde(default)]
    pub history: Vec<PaneId>,
}

impl LayoutSnapshot {
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.root
            .as_ref()
            .map(NodeSnapshot::pane_ids)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pane(id: u64, docs: &[&str]) -> NodeSnapshot {
        NodeSnapshot::Pane {
            id: PaneId(id),
            tabs: docs
                .iter()
                .enumerate()
                .map(|(i, doc)| TabSnapshot {
                    id: TabId(100 + id * 10 + i as u64),
                    document: DocumentRef::file(*doc),
                    title: doc.to_string(),
                    icon: None,
                    dirty: false,
                })
                .collect(),
            selected: if docs.is_empty() { None } else { Some(0) },
        }
    }

    #[test]
    fn pane_ids_are_preorder() {
        let root = NodeSnapshot::Container {
            id: ContainerId(9),
            axis: Axis::Row,
            children: vec![
                pane(1, &["a"]),
                NodeSnapshot::Container {
                    id: ContainerId(8),
                    axis: Axis::Column,
                    children: vec![pane(2, &["b"]), pane(3, &["c"])],
                },
            ],
        };
        assert_eq!(root.pane_ids(), vec![PaneId(1), PaneId(2), PaneId(3)]);
        assert_eq!(root.max_id(), 130);
    }

    #[test]
    fn json_shape_is_tagged() {
        let snapshot = LayoutSnapshot {
            root: Some(pane(1, &["a.txt"])),
            active: Some(PaneId(1)),
            history: vec![PaneId(1)],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["root"]["kind"], "pane");
        assert_eq!(json["root"]["tabs"][0]["document"]["file"], "a.txt");

        let back: LayoutSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn empty_snapshot_has_no_panes() {
        let snapshot = LayoutSnapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.pane_ids().is_empty());
    }
}
