// ABOUTME: Text rendering of layout trees and change events.
// ABOUTME: Produces the indented outline printed by the `show` command.

use std::fmt::Write;

use tg_layout::{LayoutEvent, LayoutManager, LayoutTree, NodeRef, Pane, PaneId};

/// Indented outline of the tree, one node per line, active pane marked with `*`
pub fn outline(manager: &LayoutManager) -> String {
    let mut out = String::new();
    match manager.tree().root() {
        Some(root) => write_node(&mut out, manager.tree(), root, manager.active_pane(), 0),
        None => out.push_str("(empty layout)\n"),
    }
    out
}

fn write_node(
    out: &mut String,
    tree: &LayoutTree,
    node: NodeRef,
    active: Option<PaneId>,
    depth: usize,
) {
    let indent = "  ".repeat(depth);
    match node {
        NodeRef::Pane(id) => {
            let Some(pane) = tree.pane(id) else {
                return;
            };
            let marker = if active == Some(id) { "*" } else { "" };
            let _ = writeln!(out, "{}{}{}: {}", indent, id, marker, tabs(pane));
        }
        NodeRef::Container(id) => {
            let Some(container) = tree.container(id) else {
                return;
            };
            let _ = writeln!(out, "{}{} {}", indent, id, container.axis().label());
            for child in container.children() {
                write_node(out, tree, *child, active, depth + 1);
            }
        }
    }
}

/// Tabs of a pane; `>` marks the selection and `+` unsaved changes
fn tabs(pane: &Pane) -> String {
    if pane.is_empty() {
        return "(no tabs)".to_string();
    }
    let selected = pane.selected_tab().map(|tab| tab.id());
    pane.tabs()
        .iter()
        .map(|tab| {
            format!(
                "{}{} {}{}",
                if selected == Some(tab.id()) { ">" } else { "" },
                tab.id(),
                tab.title(),
                if tab.is_dirty() { "+" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn event(event: &LayoutEvent) -> String {
    match event {
        LayoutEvent::TabOpened { pane, tab } => format!("tab-opened {} {}", pane, tab),
        LayoutEvent::TabSelected { pane, tab } => format!("tab-selected {} {}", pane, tab),
        LayoutEvent::TabClosed { pane, tab } => format!("tab-closed {} {}", pane, tab),
        LayoutEvent::TabUpdated { pane, tab } => format!("tab-updated {} {}", pane, tab),
        LayoutEvent::PaneAdded { pane } => format!("pane-added {}", pane),
        LayoutEvent::PaneRemoved { pane } => format!("pane-removed {}", pane),
        LayoutEvent::StructureChanged { subtree } => match subtree {
            Some(container) => format!("structure-changed {}", container),
            None => "structure-changed root".to_string(),
        },
        LayoutEvent::ActivePaneChanged { previous, current } => {
            format!("active {} -> {}", pane_label(*previous), pane_label(*current))
        }
    }
}

fn pane_label(pane: Option<PaneId>) -> String {
    pane.map_or_else(|| "none".to_string(), |pane| pane.to_string())
}
