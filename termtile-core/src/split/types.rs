//! Core type definitions for the pane tree
//!
//! This module contains the identifier types and small enums used
//! throughout the layout system.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pane (leaf or split) within a pane tree.
///
/// Pane IDs persist while the tree is restructured, so an id handed to
/// the presentation layer stays valid until the pane itself is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaneId(pub Uuid);

impl PaneId {
    /// Creates a new random pane ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaneId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pane({})", self.0)
    }
}

/// Unique identifier for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub Uuid);

impl TabId {
    /// Creates a new random tab ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tab({})", self.0)
    }
}

/// Unique identifier for a live session.
///
/// Session IDs are allocated by the transport and are never reused for
/// the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a new random session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a session ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session({})", self.0)
    }
}

/// Identifier of a saved connection.
///
/// Connections are distinct from sessions: a connection is a stored
/// server configuration, a session is one live instance of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Creates a new random connection ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ConnectionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// What a session was opened against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConnectionRef {
    /// A stored remote connection.
    Saved {
        /// Id of the stored connection.
        id: ConnectionId,
    },
    /// A local shell process. `None` uses the user's default shell.
    LocalShell {
        /// Shell executable path.
        shell: Option<String>,
    },
}

impl ConnectionRef {
    /// Reference to a stored connection.
    #[must_use]
    pub const fn saved(id: ConnectionId) -> Self {
        Self::Saved { id }
    }

    /// Reference to the user's default local shell.
    #[must_use]
    pub const fn local() -> Self {
        Self::LocalShell { shell: None }
    }

    /// Returns true for local shell sessions.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::LocalShell { .. })
    }
}

impl fmt::Display for ConnectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved { id } => write!(f, "connection:{id}"),
            Self::LocalShell { shell: Some(shell) } => write!(f, "local:{shell}"),
            Self::LocalShell { shell: None } => write!(f, "local"),
        }
    }
}

/// A reference to a live session, as held by a leaf pane.
///
/// The leaf does not own the session; the transport creates and destroys
/// it and the session registry holds its resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionRef {
    /// Session identifier.
    pub id: SessionId,
    /// What the session was opened against.
    pub connection: ConnectionRef,
    /// Title shown for the session.
    pub display_name: String,
}

impl SessionRef {
    /// Creates a session reference.
    #[must_use]
    pub fn new(id: SessionId, connection: ConnectionRef, display_name: impl Into<String>) -> Self {
        Self {
            id,
            connection,
            display_name: display_name.into(),
        }
    }

    /// Creates a reference to a fresh local shell session (mostly for tests).
    #[must_use]
    pub fn local(display_name: impl Into<String>) -> Self {
        Self::new(SessionId::new(), ConnectionRef::local(), display_name)
    }
}

/// Axis along which a split arranges its two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    /// Children side by side: first is left, second is right.
    Horizontal,
    /// Children stacked: first is top, second is bottom.
    Vertical,
}

impl fmt::Display for SplitAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "Horizontal"),
            Self::Vertical => write!(f, "Vertical"),
        }
    }
}

/// Edge of a pane that a dragged pane is dropped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
    /// Right edge.
    Right,
}

impl Edge {
    /// Split axis produced by dropping onto this edge.
    #[must_use]
    pub const fn axis(self) -> SplitAxis {
        match self {
            Self::Left | Self::Right => SplitAxis::Horizontal,
            Self::Top | Self::Bottom => SplitAxis::Vertical,
        }
    }

    /// Whether the dropped pane becomes the first child of the new split.
    #[must_use]
    pub const fn places_first(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Direction of a cyclic focus walk over the leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavDirection {
    /// Next leaf in pre-order, wrapping to the first.
    Next,
    /// Previous leaf in pre-order, wrapping to the last.
    Previous,
}
