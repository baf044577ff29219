//! Tree transformations
//!
//! Every transformation takes the tree by value and returns the new tree.
//! Untouched subtrees are moved into the result, only the nodes on the
//! path to the change are rebuilt. Ids that do not resolve leave the tree
//! unchanged: the presentation layer may act on stale ids.

use super::tree::{LeafPane, PaneNode, SplitPane, clamp_ratio};
use super::types::{Edge, PaneId, SessionRef, SplitAxis};

/// Outcome of removing a node from a subtree.
enum Taken<T> {
    /// No node matched; the subtree is returned as it was.
    NotFound(PaneNode),
    /// A node was removed. `remainder` is `None` when the subtree was the
    /// removed node itself.
    Removed {
        removed: T,
        remainder: Option<PaneNode>,
    },
}

fn take_any(node: PaneNode) -> Result<PaneNode, PaneNode> {
    Ok(node)
}

fn take_leaf(node: PaneNode) -> Result<LeafPane, PaneNode> {
    match node {
        PaneNode::Leaf(leaf) => Ok(leaf),
        other @ PaneNode::Split(_) => Err(other),
    }
}

/// Reassembles a split after one side may have disappeared.
fn rejoin(
    id: PaneId,
    axis: SplitAxis,
    ratio: f64,
    first: Option<PaneNode>,
    second: Option<PaneNode>,
) -> Option<PaneNode> {
    match (first, second) {
        (Some(first), Some(second)) => Some(PaneNode::Split(SplitPane {
            id,
            axis,
            ratio,
            first: Box::new(first),
            second: Box::new(second),
        })),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

impl PaneNode {
    // ========================================================================
    // Structural helpers
    // ========================================================================

    /// Removes the node with `pane_id` if `take` accepts it.
    fn take_node<T>(self, pane_id: PaneId, take: fn(Self) -> Result<T, Self>) -> Taken<T> {
        if self.id() == pane_id {
            // Ids are unique, so a rejected node has no match below it either.
            return match take(self) {
                Ok(removed) => Taken::Removed {
                    removed,
                    remainder: None,
                },
                Err(node) => Taken::NotFound(node),
            };
        }
        match self {
            Self::Leaf(_) => Taken::NotFound(self),
            Self::Split(split) => {
                let SplitPane {
                    id,
                    axis,
                    ratio,
                    first,
                    second,
                } = split;
                match (*first).take_node(pane_id, take) {
                    Taken::Removed { removed, remainder } => Taken::Removed {
                        removed,
                        remainder: rejoin(id, axis, ratio, remainder, Some(*second)),
                    },
                    Taken::NotFound(first) => match (*second).take_node(pane_id, take) {
                        Taken::Removed { removed, remainder } => Taken::Removed {
                            removed,
                            remainder: rejoin(id, axis, ratio, Some(first), remainder),
                        },
                        Taken::NotFound(second) => Taken::NotFound(Self::Split(SplitPane {
                            id,
                            axis,
                            ratio,
                            first: Box::new(first),
                            second: Box::new(second),
                        })),
                    },
                }
            }
        }
    }

    /// Replaces the leaf `pane_id` with `build(leaf, ctx)`.
    ///
    /// When the leaf is absent the tree and the context are handed back.
    fn replace_leaf<C>(
        self,
        pane_id: PaneId,
        ctx: C,
        build: fn(LeafPane, C) -> Self,
    ) -> Result<Self, (Self, C)> {
        match self {
            Self::Leaf(leaf) if leaf.id == pane_id => Ok(build(leaf, ctx)),
            Self::Leaf(_) => Err((self, ctx)),
            Self::Split(split) => {
                let SplitPane {
                    id,
                    axis,
                    ratio,
                    first,
                    second,
                } = split;
                let rebuild = |first: Self, second: Self| {
                    Self::Split(SplitPane {
                        id,
                        axis,
                        ratio,
                        first: Box::new(first),
                        second: Box::new(second),
                    })
                };
                match (*first).replace_leaf(pane_id, ctx, build) {
                    Ok(first) => Ok(rebuild(first, *second)),
                    Err((first, ctx)) => match (*second).replace_leaf(pane_id, ctx, build) {
                        Ok(second) => Ok(rebuild(first, second)),
                        Err((second, ctx)) => Err((rebuild(first, second), ctx)),
                    },
                }
            }
        }
    }

    /// Removes the leaf `pane_id`, or hands the tree back if it is not a leaf.
    fn try_extract(self, pane_id: PaneId) -> Result<(LeafPane, Option<Self>), Self> {
        match self.take_node(pane_id, take_leaf) {
            Taken::Removed { removed, remainder } => Ok((removed, remainder)),
            Taken::NotFound(tree) => Err(tree),
        }
    }

    // ========================================================================
    // Transformations
    // ========================================================================

    /// Splits leaf `pane_id`, placing a new focused leaf for `session` after it.
    ///
    /// The original leaf becomes the first child of a
    /// `Split(axis, 0.5)` and loses focus, as does every other leaf.
    /// No-op if `pane_id` is not a leaf.
    #[must_use]
    pub fn split(self, pane_id: PaneId, axis: SplitAxis, session: SessionRef) -> Self {
        self.split_with(pane_id, axis, LeafPane::new(session))
    }

    /// Like [`split`](Self::split) but inserts a prepared leaf.
    ///
    /// No-op if `pane_id` is not a leaf or `new_leaf.id` is already used.
    #[must_use]
    pub fn split_with(self, pane_id: PaneId, axis: SplitAxis, new_leaf: LeafPane) -> Self {
        if self.contains(new_leaf.id) {
            return self;
        }
        let new_id = new_leaf.id;
        let result = self.replace_leaf(pane_id, (axis, new_leaf), |original, (axis, new_leaf)| {
            Self::Split(SplitPane::new(axis, original.into(), new_leaf.into()))
        });
        match result {
            Ok(tree) => tree.set_focus(new_id),
            Err((tree, _)) => tree,
        }
    }

    /// Removes the node `pane_id` and collapses its parent split.
    ///
    /// Passing a split id removes the whole subtree. Returns `None` when
    /// the root itself was removed. Focus is not moved to another leaf.
    #[must_use]
    pub fn close(self, pane_id: PaneId) -> Option<Self> {
        match self.take_node(pane_id, take_any) {
            Taken::Removed { remainder, .. } => remainder,
            Taken::NotFound(tree) => Some(tree),
        }
    }

    /// Removes the leaf `pane_id` and returns it with the remaining tree.
    ///
    /// If `pane_id` is not a leaf the first element is `None` and the tree
    /// is returned unchanged.
    #[must_use]
    pub fn extract(self, pane_id: PaneId) -> (Option<LeafPane>, Option<Self>) {
        match self.try_extract(pane_id) {
            Ok((leaf, remainder)) => (Some(leaf), remainder),
            Err(tree) => (None, Some(tree)),
        }
    }

    /// Moves leaf `source` next to leaf `target` on the given edge.
    ///
    /// The target is wrapped in a new `Split(edge.axis(), 0.5)`; the moved
    /// leaf is the first child for `Top`/`Left` and the second for
    /// `Bottom`/`Right`. Focus flags are left as they were.
    ///
    /// No-op when the ids are equal, when either id is not a leaf, or when
    /// the target lies inside the source's subtree.
    #[must_use]
    pub fn reorganize(self, source: PaneId, target: PaneId, edge: Edge) -> Self {
        if source == target || self.find_leaf(target).is_none() {
            return self;
        }
        if self.leaves_under(source).iter().any(|leaf| leaf.id == target) {
            return self;
        }
        let (moved, remainder) = match self.try_extract(source) {
            Ok(extracted) => extracted,
            Err(tree) => return tree,
        };
        let Some(remainder) = remainder else {
            return Self::Leaf(moved);
        };
        let result = remainder.replace_leaf(target, (edge, moved), |target, (edge, moved)| {
            let (first, second) = if edge.places_first() {
                (Self::Leaf(moved), Self::Leaf(target))
            } else {
                (Self::Leaf(target), Self::Leaf(moved))
            };
            Self::Split(SplitPane::new(edge.axis(), first, second))
        });
        match result {
            Ok(tree) => tree,
            // The target was checked above; keep the moved pane regardless.
            Err((tree, (edge, moved))) => {
                Self::Split(SplitPane::new(edge.axis(), tree, Self::Leaf(moved)))
            }
        }
    }

    /// Focuses leaf `pane_id` and unfocuses every other leaf.
    ///
    /// Unknown ids leave the tree unchanged.
    #[must_use]
    pub fn set_focus(mut self, pane_id: PaneId) -> Self {
        if self.find_leaf(pane_id).is_none() {
            return self;
        }
        self.for_each_leaf_mut(&mut |leaf| leaf.focused = leaf.id == pane_id);
        self
    }

    /// Clears focus on every leaf.
    #[must_use]
    pub fn clear_focus(mut self) -> Self {
        self.for_each_leaf_mut(&mut |leaf| leaf.focused = false);
        self
    }

    /// Sets the ratio of split `split_id`, clamped into `[0.1, 0.9]`.
    ///
    /// NaN values and unknown ids leave the tree unchanged.
    #[must_use]
    pub fn update_ratio(mut self, split_id: PaneId, value: f64) -> Self {
        if value.is_nan() {
            return self;
        }
        if let Some(split) = self.find_split_mut(split_id) {
            split.ratio = clamp_ratio(value);
        }
        self
    }
}
