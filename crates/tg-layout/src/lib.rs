// ABOUTME: Pane layout management for a multi-document editor.
// ABOUTME: Splits an editing surface into panes of tabs and tracks the active pane.

mod error;
mod event;
mod geometry;
mod history;
mod manager;
mod navigate;
mod node;
mod pane;
mod tab;
mod tree;

pub use error::{InvariantViolation, LayoutError, RestoreError};
pub use event::{LayoutEvent, Outcome};
pub use geometry::Rect;
pub use history::MruHistory;
pub use manager::{LayoutManager, PaneTarget};
pub use node::{Container, NodeRef};
pub use pane::Pane;
pub use tab::Tab;
pub use tree::{ClosedPane, ClosedTab, LayoutTree, OpenedTab};

pub use tg_core::{Axis, ContainerId, Direction, DocumentRef, LayoutSettings, PaneId, TabId};
