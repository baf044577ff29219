//! Pane tree module
//!
//! This module provides the layout model of a single tab: a binary tree of
//! nested horizontal and vertical splits whose leaves reference sessions.
//!
//! # Architecture
//!
//! - **Value semantics**: transformations consume the tree and return a new one
//! - **No parent pointers**: bottom-up edits are recursive rebuilds
//! - **Stale ids are harmless**: an id that does not resolve is a no-op
//! - **Session references only**: leaves never own session resources
//!
//! # Module Structure
//!
//! - `types` - Identifiers and small enums (`PaneId`, `SessionRef`, `SplitAxis`, `Edge`)
//! - `tree` - Node types, queries and the invariant checker (`PaneNode`)
//! - `ops` - Transformations (split, close, extract, reorganize, focus, ratio)
//! - `geometry` - Pane rectangles and hit testing (`Rect`, `Point`)
//! - `error` - Invariant violations (`InvariantViolation`)
//!
//! # Example
//!
//! ```
//! use termtile_core::split::{PaneNode, SessionRef, SplitAxis};
//!
//! let tree = PaneNode::leaf(SessionRef::local("shell"));
//! let first = tree.id();
//!
//! // Split the only pane; the new pane takes focus
//! let tree = tree.split(first, SplitAxis::Vertical, SessionRef::local("logs"));
//! assert_eq!(tree.leaf_count(), 2);
//! let second = tree.focused().unwrap().id;
//!
//! // Closing the new pane collapses the split again
//! let tree = tree.close(second).unwrap();
//! assert_eq!(tree.id(), first);
//! assert!(tree.check_invariants().is_ok());
//! ```

mod error;
mod geometry;
mod ops;
mod tree;
mod types;

pub use error::InvariantViolation;
pub use geometry::{Point, Rect};
pub use tree::{
    DEFAULT_SPLIT_RATIO, LeafPane, MAX_SPLIT_RATIO, MIN_SPLIT_RATIO, PaneNode, SplitPane,
    clamp_ratio,
};
pub use types::{
    ConnectionId, ConnectionRef, Edge, NavDirection, PaneId, SessionId, SessionRef, SplitAxis,
    TabId,
};
