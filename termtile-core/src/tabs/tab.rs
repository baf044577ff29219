//! A single tab

use serde::{Deserialize, Serialize};

use crate::split::{LeafPane, PaneNode, SessionId, SessionRef, TabId};

/// A named container for one pane tree.
///
/// A tab always has a tree; a tab whose tree would become empty is removed
/// from its [`TabSet`](super::TabSet) instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier.
    pub id: TabId,
    /// Title shown in the tab bar.
    pub name: String,
    /// Layout of the tab.
    pub pane_tree: PaneNode,
}

impl Tab {
    /// Creates a tab around an existing tree.
    #[must_use]
    pub fn new(name: impl Into<String>, pane_tree: PaneNode) -> Self {
        Self {
            id: TabId::new(),
            name: name.into(),
            pane_tree,
        }
    }

    /// Creates a tab with one focused pane showing `session`, named after it.
    #[must_use]
    pub fn for_session(session: SessionRef) -> Self {
        let name = session.display_name.clone();
        Self::new(name, PaneNode::Leaf(LeafPane::focused(session)))
    }

    /// Number of panes in the tab.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.pane_tree.leaf_count()
    }

    /// Sessions shown in the tab, in pane order.
    #[must_use]
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.pane_tree.session_ids()
    }
}
