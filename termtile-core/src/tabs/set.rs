//! Ordered tab collection with cross-tab operations
//!
//! The [`TabSet`] owns every tab's pane tree. Tree transformations are
//! applied through [`TabSet::apply_to_tab`], which removes the tab as soon
//! as its tree empties. The tab set never talks to the transport; closing
//! sessions is left to the workspace.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::tab::Tab;
use crate::split::{LeafPane, PaneId, PaneNode, SessionId, SessionRef, SplitAxis, SplitPane, TabId};

/// Number of panes a tab may hold before closing it needs confirmation.
pub const DEFAULT_CONFIRM_CLOSE_THRESHOLD: usize = 1;

/// What closing a tab would affect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosePlan {
    /// Tab to close.
    pub tab_id: TabId,
    /// Sessions that would be disconnected, in pane order.
    pub sessions: Vec<SessionId>,
    /// Whether the user must confirm first.
    pub requires_confirmation: bool,
}

/// Result of applying a tree transformation to a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The tab holds the new tree.
    Updated,
    /// The tree emptied and the tab was removed.
    TabClosed,
    /// No tab with that id.
    TabNotFound,
}

/// Serializable copy of a tab set for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSetSnapshot {
    /// Tabs in display order.
    pub tabs: Vec<Tab>,
    /// Active tab, if any.
    pub active_tab_id: Option<TabId>,
}

impl TabSetSnapshot {
    /// Serializes the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// The active tab, if any.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        let id = self.active_tab_id?;
        self.tabs.iter().find(|tab| tab.id == id)
    }
}

/// Ordered tabs plus the active tab id.
#[derive(Debug, Clone)]
pub struct TabSet {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    confirm_close_threshold: usize,
}

impl Default for TabSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TabSet {
    /// Creates an empty tab set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            confirm_close_threshold: DEFAULT_CONFIRM_CLOSE_THRESHOLD,
        }
    }

    /// Sets how many panes a tab may hold before closing it needs confirmation.
    #[must_use]
    pub const fn with_confirm_threshold(mut self, threshold: usize) -> Self {
        self.confirm_close_threshold = threshold;
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tabs in display order.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Number of tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true if there are no tabs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Ids of all tabs in display order.
    #[must_use]
    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|tab| tab.id).collect()
    }

    /// Looks up a tab.
    #[must_use]
    pub fn tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == tab_id)
    }

    /// Position of a tab.
    #[must_use]
    pub fn index_of(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == tab_id)
    }

    /// The active tab id.
    #[must_use]
    pub const fn active_tab_id(&self) -> Option<TabId> {
        self.active
    }

    /// The active tab.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.tab(id))
    }

    /// The tab containing a pane (leaf or split).
    #[must_use]
    pub fn tab_of_pane(&self, pane_id: PaneId) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|tab| tab.pane_tree.contains(pane_id))
            .map(|tab| tab.id)
    }

    /// The tab and pane showing a session.
    #[must_use]
    pub fn find_session(&self, session_id: SessionId) -> Option<(TabId, PaneId)> {
        self.tabs.iter().find_map(|tab| {
            tab.pane_tree
                .find_session(session_id)
                .map(|leaf| (tab.id, leaf.id))
        })
    }

    /// Every session shown in any tab.
    #[must_use]
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.tabs.iter().flat_map(Tab::session_ids).collect()
    }

    /// Read-only copy for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> TabSetSnapshot {
        TabSetSnapshot {
            tabs: self.tabs.clone(),
            active_tab_id: self.active,
        }
    }

    /// Whether closing `pane_count` panes at once needs confirmation.
    #[must_use]
    pub const fn requires_confirmation(&self, pane_count: usize) -> bool {
        pane_count > self.confirm_close_threshold
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Appends a tab with one focused pane for `session` and activates it.
    pub fn open_tab(&mut self, session: SessionRef) -> TabId {
        self.insert_tab(Tab::for_session(session))
    }

    /// Appends a tab holding `tree` and activates it.
    ///
    /// If no leaf of `tree` is focused, the first one is.
    pub fn push_tab(&mut self, name: impl Into<String>, tree: PaneNode) -> TabId {
        let tree = if tree.focused().is_some() {
            tree
        } else {
            let first = tree.first_leaf().id;
            tree.set_focus(first)
        };
        self.insert_tab(Tab::new(name, tree))
    }

    fn insert_tab(&mut self, tab: Tab) -> TabId {
        let id = tab.id;
        tracing::debug!(tab_id = %id, name = %tab.name, "Tab opened");
        self.tabs.push(tab);
        self.active = Some(id);
        id
    }

    /// Makes `tab_id` active.
    ///
    /// A real change focuses the first pane of the new tab. Re-activating
    /// the active tab changes nothing. Returns true on a real change.
    pub fn switch_tab(&mut self, tab_id: TabId) -> bool {
        if self.active == Some(tab_id) {
            return false;
        }
        match self.index_of(tab_id) {
            Some(index) => {
                self.activate_at(index);
                true
            }
            None => false,
        }
    }

    fn activate_at(&mut self, index: usize) {
        if let Some(tab) = self.tabs.get_mut(index) {
            let first = tab.pane_tree.first_leaf().id;
            tab.pane_tree
                .for_each_leaf_mut(&mut |leaf| leaf.focused = leaf.id == first);
            self.active = Some(tab.id);
        }
    }

    /// What closing `tab_id` would affect.
    #[must_use]
    pub fn close_plan(&self, tab_id: TabId) -> Option<ClosePlan> {
        self.tab(tab_id).map(|tab| {
            let sessions = tab.session_ids();
            ClosePlan {
                tab_id,
                requires_confirmation: self.requires_confirmation(sessions.len()),
                sessions,
            }
        })
    }

    /// Removes a tab and returns it.
    ///
    /// If it was active, the tab before it (or the first remaining tab)
    /// becomes active.
    pub fn close_tab(&mut self, tab_id: TabId) -> Option<Tab> {
        let index = self.index_of(tab_id)?;
        let tab = self.tabs.remove(index);
        self.after_removal(index, tab_id);
        tracing::debug!(tab_id = %tab_id, "Tab closed");
        Some(tab)
    }

    fn after_removal(&mut self, index: usize, removed: TabId) {
        if self.active != Some(removed) {
            return;
        }
        if self.tabs.is_empty() {
            self.active = None;
        } else {
            self.activate_at(index.saturating_sub(1));
        }
    }

    // ========================================================================
    // Tree updates
    // ========================================================================

    /// Replaces a tab's tree with `f(tree)`; `None` removes the tab.
    pub fn apply_to_tab<F>(&mut self, tab_id: TabId, f: F) -> ApplyOutcome
    where
        F: FnOnce(PaneNode) -> Option<PaneNode>,
    {
        let Some(index) = self.index_of(tab_id) else {
            return ApplyOutcome::TabNotFound;
        };
        let Tab {
            id,
            name,
            pane_tree,
        } = self.tabs.remove(index);
        match f(pane_tree) {
            Some(pane_tree) => {
                debug_assert!(pane_tree.check_invariants().is_ok());
                self.tabs.insert(
                    index,
                    Tab {
                        id,
                        name,
                        pane_tree,
                    },
                );
                ApplyOutcome::Updated
            }
            None => {
                self.after_removal(index, id);
                tracing::debug!(tab_id = %id, "Tab emptied and removed");
                ApplyOutcome::TabClosed
            }
        }
    }

    /// Like [`apply_to_tab`](Self::apply_to_tab) on the active tab.
    pub fn apply_to_active<F>(&mut self, f: F) -> ApplyOutcome
    where
        F: FnOnce(PaneNode) -> Option<PaneNode>,
    {
        match self.active {
            Some(id) => self.apply_to_tab(id, f),
            None => ApplyOutcome::TabNotFound,
        }
    }

    // ========================================================================
    // Cross-tab operations
    // ========================================================================

    /// Moves a pane out of its tab into a new tab, which becomes active.
    ///
    /// The source tab is removed if it empties. Returns the new tab id, or
    /// `None` if `pane_id` is not a leaf of `tab_id`.
    pub fn detach_pane(&mut self, tab_id: TabId, pane_id: PaneId) -> Option<TabId> {
        let index = self.index_of(tab_id)?;
        self.tabs[index].pane_tree.find_leaf(pane_id)?;

        let mut extracted: Option<LeafPane> = None;
        self.apply_to_tab(tab_id, |tree| {
            let (leaf, remainder) = tree.extract(pane_id);
            extracted = leaf;
            remainder
        });
        let mut leaf = extracted?;
        leaf.focused = true;
        let name = leaf.session.display_name.clone();
        let new_id = self.insert_tab(Tab::new(name, PaneNode::Leaf(leaf)));
        tracing::debug!(tab_id = %tab_id, pane_id = %pane_id, new_tab = %new_id, "Pane detached");
        Some(new_id)
    }

    /// Folds `source` into `target` as the second half of a vertical split.
    ///
    /// Focus goes back to the pane that was focused in the target (or its
    /// first pane). The source tab is removed and the target activated.
    /// Returns false if the ids are equal or either tab is missing.
    pub fn merge_tab(&mut self, source: TabId, target: TabId) -> bool {
        if source == target || self.tab(target).is_none() {
            return false;
        }
        let Some(source_index) = self.index_of(source) else {
            return false;
        };
        let source_tab = self.tabs.remove(source_index);
        if self.active == Some(source) {
            self.active = None;
        }
        self.apply_to_tab(target, |target_tree| {
            let focus = target_tree
                .focused()
                .map_or_else(|| target_tree.first_leaf().id, |leaf| leaf.id);
            let merged = PaneNode::Split(SplitPane::new(
                SplitAxis::Vertical,
                target_tree,
                source_tab.pane_tree,
            ));
            Some(merged.set_focus(focus))
        });
        self.active = Some(target);
        tracing::debug!(source = %source, target = %target, "Tabs merged");
        true
    }

    /// Renames a tab. Returns false if it does not exist.
    pub fn rename_tab(&mut self, tab_id: TabId, name: impl Into<String>) -> bool {
        match self.tabs.iter_mut().find(|tab| tab.id == tab_id) {
            Some(tab) => {
                tab.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Reorders tabs to match `order`.
    ///
    /// `order` must be a permutation of the current tab ids; anything else
    /// is ignored and false is returned.
    pub fn reorder_tabs(&mut self, order: &[TabId]) -> bool {
        if order.len() != self.tabs.len() {
            return false;
        }
        let mut seen = HashSet::with_capacity(order.len());
        if !order
            .iter()
            .all(|id| seen.insert(*id) && self.index_of(*id).is_some())
        {
            return false;
        }
        let mut remaining = std::mem::take(&mut self.tabs);
        for id in order {
            if let Some(pos) = remaining.iter().position(|tab| tab.id == *id) {
                self.tabs.push(remaining.swap_remove(pos));
            }
        }
        true
    }

    /// Moves one tab to `index` (clamped to the last position).
    pub fn move_tab(&mut self, tab_id: TabId, index: usize) -> bool {
        let Some(from) = self.index_of(tab_id) else {
            return false;
        };
        let tab = self.tabs.remove(from);
        let to = index.min(self.tabs.len());
        self.tabs.insert(to, tab);
        true
    }
}
