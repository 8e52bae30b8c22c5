// ABOUTME: Shared types and configuration for tabgrid.
// ABOUTME: Defines ids, directions, document references, snapshots and config files.

pub mod config;
pub mod direction;
pub mod document;
pub mod ids;
pub mod session;
pub mod snapshot;

pub use config::{Config, ConfigError, LayoutSettings, SessionSettings};
pub use direction::{Axis, Direction, ParseDirectionError, Placement};
pub use document::DocumentRef;
pub use ids::{ContainerId, IdAllocator, PaneId, TabId};
pub use session::{SessionData, SessionError};
pub use snapshot::{LayoutSnapshot, NodeSnapshot, TabSnapshot};
