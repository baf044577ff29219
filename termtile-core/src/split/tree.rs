//! Pane tree structure for split layouts
//!
//! This module provides the binary tree used to represent a tab's layout.
//! Each node is either a leaf pane (holding a reference to one session) or
//! a split node (holding exactly two children along an axis).
//!
//! # Tree Structure
//!
//! ```text
//! Split(Horizontal, 0.5)
//! ├── Leaf(A, session_1)
//! └── Split(Vertical, 0.5)
//!     ├── Leaf(B, session_2)
//!     └── Leaf(C, session_3)
//! ```
//!
//! There are no parent pointers. Read-only queries live here; the
//! transformations that rebuild the tree are in `ops.rs`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::InvariantViolation;
use super::types::{NavDirection, PaneId, SessionId, SessionRef, SplitAxis};

/// Default split ratio (50% of available space).
pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;

/// Minimum valid split ratio.
pub const MIN_SPLIT_RATIO: f64 = 0.1;

/// Maximum valid split ratio.
pub const MAX_SPLIT_RATIO: f64 = 0.9;

/// Clamps a ratio into `[MIN_SPLIT_RATIO, MAX_SPLIT_RATIO]`.
///
/// NaN maps to the default ratio.
#[must_use]
pub fn clamp_ratio(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_SPLIT_RATIO
    } else {
        value.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)
    }
}

/// A node in the pane tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaneNode {
    /// A leaf pane displaying one session.
    Leaf(LeafPane),
    /// A split containing two child nodes.
    Split(SplitPane),
}

/// A leaf pane in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafPane {
    /// Unique identifier for this pane.
    pub id: PaneId,
    /// Session shown in this pane.
    pub session: SessionRef,
    /// Whether this pane has keyboard focus.
    pub focused: bool,
}

/// A split node dividing its space between two children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPane {
    /// Unique identifier for this split.
    pub id: PaneId,
    /// Axis along which the children are arranged.
    pub axis: SplitAxis,
    /// Proportion of space given to the first child.
    pub ratio: f64,
    /// First child (left for horizontal, top for vertical).
    pub first: Box<PaneNode>,
    /// Second child (right for horizontal, bottom for vertical).
    pub second: Box<PaneNode>,
}

impl LeafPane {
    /// Creates an unfocused leaf with a fresh id.
    #[must_use]
    pub fn new(session: SessionRef) -> Self {
        Self {
            id: PaneId::new(),
            session,
            focused: false,
        }
    }

    /// Creates a focused leaf with a fresh id.
    #[must_use]
    pub fn focused(session: SessionRef) -> Self {
        Self {
            focused: true,
            ..Self::new(session)
        }
    }

    /// Creates an unfocused leaf with the given id.
    #[must_use]
    pub const fn with_id(id: PaneId, session: SessionRef) -> Self {
        Self {
            id,
            session,
            focused: false,
        }
    }
}

impl SplitPane {
    /// Creates a split with the default ratio.
    #[must_use]
    pub fn new(axis: SplitAxis, first: PaneNode, second: PaneNode) -> Self {
        Self::with_ratio(axis, first, second, DEFAULT_SPLIT_RATIO)
    }

    /// Creates a split with a custom ratio, clamped into the valid range.
    #[must_use]
    pub fn with_ratio(axis: SplitAxis, first: PaneNode, second: PaneNode, ratio: f64) -> Self {
        Self {
            id: PaneId::new(),
            axis,
            ratio: clamp_ratio(ratio),
            first: Box::new(first),
            second: Box::new(second),
        }
    }
}

impl From<LeafPane> for PaneNode {
    fn from(leaf: LeafPane) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<SplitPane> for PaneNode {
    fn from(split: SplitPane) -> Self {
        Self::Split(split)
    }
}

impl PaneNode {
    /// Creates an unfocused leaf node for a session.
    #[must_use]
    pub fn leaf(session: SessionRef) -> Self {
        Self::Leaf(LeafPane::new(session))
    }

    /// Creates a split node with the default ratio.
    #[must_use]
    pub fn split_of(axis: SplitAxis, first: Self, second: Self) -> Self {
        Self::Split(SplitPane::new(axis, first, second))
    }

    /// Returns the id of this node.
    #[must_use]
    pub const fn id(&self) -> PaneId {
        match self {
            Self::Leaf(leaf) => leaf.id,
            Self::Split(split) => split.id,
        }
    }

    /// Returns true if this is a leaf node.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns true if this is a split node.
    #[must_use]
    pub const fn is_split(&self) -> bool {
        matches!(self, Self::Split(_))
    }

    /// Returns the leaf if this is a leaf node.
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&LeafPane> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Split(_) => None,
        }
    }

    /// Returns the split if this is a split node.
    #[must_use]
    pub const fn as_split(&self) -> Option<&SplitPane> {
        match self {
            Self::Leaf(_) => None,
            Self::Split(split) => Some(split),
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Finds any node (leaf or split) by id.
    #[must_use]
    pub fn find_node(&self, pane_id: PaneId) -> Option<&Self> {
        if self.id() == pane_id {
            return Some(self);
        }
        match self {
            Self::Leaf(_) => None,
            Self::Split(split) => split
                .first
                .find_node(pane_id)
                .or_else(|| split.second.find_node(pane_id)),
        }
    }

    /// Finds a leaf by id.
    #[must_use]
    pub fn find_leaf(&self, pane_id: PaneId) -> Option<&LeafPane> {
        self.find_node(pane_id).and_then(Self::as_leaf)
    }

    /// Finds the leaf showing the given session.
    #[must_use]
    pub fn find_session(&self, session_id: SessionId) -> Option<&LeafPane> {
        self.leaves()
            .into_iter()
            .find(|leaf| leaf.session.id == session_id)
    }

    /// Returns true if any node has the given id.
    #[must_use]
    pub fn contains(&self, pane_id: PaneId) -> bool {
        self.find_node(pane_id).is_some()
    }

    #[cfg(test)]
    pub(crate) fn find_leaf_mut(&mut self, pane_id: PaneId) -> Option<&mut LeafPane> {
        match self {
            Self::Leaf(leaf) => (leaf.id == pane_id).then_some(leaf),
            Self::Split(split) => {
                if let Some(leaf) = split.first.find_leaf_mut(pane_id) {
                    Some(leaf)
                } else {
                    split.second.find_leaf_mut(pane_id)
                }
            }
        }
    }

    pub(crate) fn find_split_mut(&mut self, split_id: PaneId) -> Option<&mut SplitPane> {
        match self {
            Self::Leaf(_) => None,
            Self::Split(split) => {
                if split.id == split_id {
                    return Some(split);
                }
                if let Some(found) = split.first.find_split_mut(split_id) {
                    Some(found)
                } else {
                    split.second.find_split_mut(split_id)
                }
            }
        }
    }

    pub(crate) fn for_each_leaf_mut<F: FnMut(&mut LeafPane)>(&mut self, f: &mut F) {
        match self {
            Self::Leaf(leaf) => f(leaf),
            Self::Split(split) => {
                split.first.for_each_leaf_mut(f);
                split.second.for_each_leaf_mut(f);
            }
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Returns all leaves in pre-order (first child before second).
    #[must_use]
    pub fn leaves(&self) -> Vec<&LeafPane> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafPane>) {
        match self {
            Self::Leaf(leaf) => out.push(leaf),
            Self::Split(split) => {
                split.first.collect_leaves(out);
                split.second.collect_leaves(out);
            }
        }
    }

    /// Returns the leaves of the subtree rooted at `pane_id`.
    ///
    /// A leaf id yields that single leaf; an unknown id yields nothing.
    #[must_use]
    pub fn leaves_under(&self, pane_id: PaneId) -> Vec<&LeafPane> {
        self.find_node(pane_id)
            .map(Self::leaves)
            .unwrap_or_default()
    }

    /// Returns the ids of all leaves in pre-order.
    #[must_use]
    pub fn leaf_ids(&self) -> Vec<PaneId> {
        self.leaves().into_iter().map(|leaf| leaf.id).collect()
    }

    /// Returns the session ids shown in the tree, in pre-order.
    #[must_use]
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.leaves()
            .into_iter()
            .map(|leaf| leaf.session.id)
            .collect()
    }

    /// Returns the first leaf (leftmost/topmost).
    #[must_use]
    pub fn first_leaf(&self) -> &LeafPane {
        match self {
            Self::Leaf(leaf) => leaf,
            Self::Split(split) => split.first.first_leaf(),
        }
    }

    /// Returns the focused leaf, if any.
    #[must_use]
    pub fn focused(&self) -> Option<&LeafPane> {
        match self {
            Self::Leaf(leaf) => leaf.focused.then_some(leaf),
            Self::Split(split) => split.first.focused().or_else(|| split.second.focused()),
        }
    }

    /// Returns the leaf next to `pane_id` in pre-order, wrapping around.
    ///
    /// Returns `None` if `pane_id` is not a leaf of this tree.
    #[must_use]
    pub fn adjacent(&self, pane_id: PaneId, direction: NavDirection) -> Option<PaneId> {
        let leaves = self.leaves();
        let index = leaves.iter().position(|leaf| leaf.id == pane_id)?;
        let len = leaves.len();
        let target = match direction {
            NavDirection::Next => (index + 1) % len,
            NavDirection::Previous => (index + len - 1) % len,
        };
        Some(leaves[target].id)
    }

    /// Returns the number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Split(split) => split.first.leaf_count() + split.second.leaf_count(),
        }
    }

    /// Returns the depth of the tree. A single leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Split(split) => 1 + split.first.depth().max(split.second.depth()),
        }
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Checks the structural invariants of the tree.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: more than one focused leaf, a
    /// ratio outside `[0.1, 0.9]`, or a duplicated pane id.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let focused = self.leaves().iter().filter(|leaf| leaf.focused).count();
        if focused > 1 {
            return Err(InvariantViolation::MultipleFocused { count: focused });
        }
        let mut seen = HashSet::new();
        self.check_node(&mut seen)
    }

    fn check_node(&self, seen: &mut HashSet<PaneId>) -> Result<(), InvariantViolation> {
        if !seen.insert(self.id()) {
            return Err(InvariantViolation::DuplicatePaneId(self.id()));
        }
        if let Self::Split(split) = self {
            if !(MIN_SPLIT_RATIO..=MAX_SPLIT_RATIO).contains(&split.ratio) {
                return Err(InvariantViolation::RatioOutOfRange {
                    split: split.id,
                    ratio: split.ratio,
                });
            }
            split.first.check_node(seen)?;
            split.second.check_node(seen)?;
        }
        Ok(())
    }
}
