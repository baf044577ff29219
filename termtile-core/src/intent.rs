//! Typed user intents
//!
//! The presentation layer never mutates layout state directly. It sends an
//! [`Intent`] to the [`Workspace`](crate::Workspace), which applies it and
//! reports an [`IntentOutcome`].

use serde::{Deserialize, Serialize};

use crate::split::{ConnectionRef, Edge, NavDirection, PaneId, SessionId, SplitAxis, TabId};

/// A request from the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Split a pane and open a new session in the new half.
    Split {
        /// Pane to split.
        pane_id: PaneId,
        /// Direction of the split.
        axis: SplitAxis,
        /// What to connect the new session to.
        connection: ConnectionRef,
        /// Title for the new session.
        #[serde(default)]
        display_name: Option<String>,
    },
    /// Close a pane (a split id closes everything under it).
    Close {
        /// Pane to close.
        pane_id: PaneId,
    },
    /// Focus a pane, switching to its tab if needed.
    Focus {
        /// Pane to focus.
        pane_id: PaneId,
    },
    /// Move focus to the next or previous pane of the active tab.
    FocusAdjacent {
        /// Direction to move.
        direction: NavDirection,
    },
    /// Move a divider.
    RatioChange {
        /// Split whose ratio changes.
        split_id: PaneId,
        /// New ratio, clamped.
        ratio: f64,
    },
    /// Move a pane out into its own tab.
    Detach {
        /// Tab holding the pane.
        tab_id: TabId,
        /// Pane to move.
        pane_id: PaneId,
    },
    /// Move a pane next to another pane.
    Reorganize {
        /// Pane being moved.
        source: PaneId,
        /// Pane it is dropped onto.
        target: PaneId,
        /// Edge of the target.
        edge: Edge,
    },
    /// Fold one tab into another.
    MergeTab {
        /// Tab that disappears.
        source: TabId,
        /// Tab that receives the panes.
        target: TabId,
    },
    /// Close a tab and every session in it.
    CloseTab {
        /// Tab to close.
        tab_id: TabId,
    },
    /// Rename a tab.
    RenameTab {
        /// Tab to rename.
        tab_id: TabId,
        /// New title.
        name: String,
    },
    /// Make a tab active.
    SwitchTab {
        /// Tab to activate.
        tab_id: TabId,
    },
    /// Reorder all tabs.
    ReorderTabs {
        /// Every tab id, in the new order.
        order: Vec<TabId>,
    },
    /// Move one tab.
    MoveTab {
        /// Tab to move.
        tab_id: TabId,
        /// New position.
        index: usize,
    },
    /// Open a new tab with a new session.
    NewTab {
        /// What to connect to.
        connection: ConnectionRef,
        /// Title for the session and tab.
        #[serde(default)]
        display_name: Option<String>,
    },
}

impl Intent {
    /// Short name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Split { .. } => "split",
            Self::Close { .. } => "close",
            Self::Focus { .. } => "focus",
            Self::FocusAdjacent { .. } => "focus_adjacent",
            Self::RatioChange { .. } => "ratio_change",
            Self::Detach { .. } => "detach",
            Self::Reorganize { .. } => "reorganize",
            Self::MergeTab { .. } => "merge_tab",
            Self::CloseTab { .. } => "close_tab",
            Self::RenameTab { .. } => "rename_tab",
            Self::SwitchTab { .. } => "switch_tab",
            Self::ReorderTabs { .. } => "reorder_tabs",
            Self::MoveTab { .. } => "move_tab",
            Self::NewTab { .. } => "new_tab",
        }
    }

    /// Returns true for intents that can disconnect sessions.
    #[must_use]
    pub const fn is_destructive(&self) -> bool {
        matches!(self, Self::Close { .. } | Self::CloseTab { .. })
    }
}

/// Whether the user has already confirmed a destructive intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confirmation {
    /// Ask first if the intent affects several sessions.
    #[default]
    Unconfirmed,
    /// The user agreed.
    Confirmed,
}

impl Confirmation {
    /// Returns true if confirmed.
    #[must_use]
    pub const fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// What happened to an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// State changed.
    Applied,
    /// Nothing to do: unknown ids, or already in the requested state.
    NoOp,
    /// Re-send with [`Confirmation::Confirmed`] to close these sessions.
    NeedsConfirmation {
        /// Sessions that would be disconnected.
        sessions: Vec<SessionId>,
    },
    /// A session could not be opened; a notification was queued.
    Failed,
    /// A session was opened but its target pane was gone, so it was closed.
    Cancelled,
}

impl IntentOutcome {
    /// Returns true if state changed.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub(crate) const fn from_changed(changed: bool) -> Self {
        if changed { Self::Applied } else { Self::NoOp }
    }
}
