//! Invariant violations for pane trees
//!
//! Transformations never fail (unknown ids are no-ops), so the only error
//! type in this module describes a tree that breaks one of the structural
//! invariants. It is produced by [`PaneNode::check_invariants`].
//!
//! [`PaneNode::check_invariants`]: super::PaneNode::check_invariants

use super::types::PaneId;

/// A structural invariant that a pane tree does not hold.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// More than one leaf is focused.
    #[error("{count} leaves are focused, at most one is allowed")]
    MultipleFocused {
        /// Number of focused leaves found.
        count: usize,
    },

    /// A split ratio lies outside the allowed range.
    #[error("split {split} has ratio {ratio} outside [0.1, 0.9]")]
    RatioOutOfRange {
        /// The offending split.
        split: PaneId,
        /// Its ratio.
        ratio: f64,
    },

    /// The same pane id appears twice.
    #[error("duplicate pane id: {0}")]
    DuplicatePaneId(PaneId),
}
