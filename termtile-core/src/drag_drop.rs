//! Drag-and-drop model for pane and tab gestures
//!
//! This module provides a pure state machine for drag gestures, so the
//! drop logic can be tested without any UI toolkit. The reorganizer only
//! proposes a [`DropAction`]; the workspace decides whether to apply it.
//!
//! ```text
//! Idle --begin--> Dragging(gesture, target?) --drop/cancel--> Idle
//! ```

use crate::split::{Edge, PaneId, PaneNode, Point, Rect, TabId};

/// Classifies which edge of a `width` x `height` box a point is nearest to.
///
/// `(x, y)` is relative to the box's top-left corner. The four distances
/// are compared and the smallest wins; ties go to the first of top,
/// bottom, left, right.
#[must_use]
pub fn calculate_edge(x: f64, y: f64, width: f64, height: f64) -> Edge {
    let distances = [
        (Edge::Top, y),
        (Edge::Bottom, height - y),
        (Edge::Left, x),
        (Edge::Right, width - x),
    ];
    let mut best = distances[0];
    for candidate in &distances[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}

/// Like [`calculate_edge`] for a point in layout coordinates.
#[must_use]
pub fn calculate_edge_in(bounds: Rect, point: Point) -> Edge {
    let local = bounds.relative(point);
    calculate_edge(local.x, local.y, bounds.width, bounds.height)
}

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragGesture {
    /// A pane, to be moved within its tree or out to the tab bar.
    Pane(PaneId),
    /// A tab, to be reordered or merged into another tab.
    Tab(TabId),
}

/// Where the pointer currently proposes to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// An edge of a pane.
    Pane {
        /// Pane under the pointer.
        pane_id: PaneId,
        /// Nearest edge.
        edge: Edge,
    },
    /// Another tab's header.
    Tab(TabId),
    /// A gap in the tab bar, as an insertion index.
    TabSlot(usize),
}

/// Operation proposed when a gesture is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Move `source` next to `target` on `edge`.
    Reorganize {
        /// Dragged pane.
        source: PaneId,
        /// Pane dropped onto.
        target: PaneId,
        /// Edge dropped onto.
        edge: Edge,
    },
    /// Move a pane out into a new tab.
    DetachPane(PaneId),
    /// Fold `source` into `target`.
    MergeTab {
        /// Dragged tab.
        source: TabId,
        /// Tab dropped onto.
        target: TabId,
    },
    /// Move a tab to a new position.
    MoveTab {
        /// Dragged tab.
        tab_id: TabId,
        /// New position.
        index: usize,
    },
}

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture is in progress.
    Dragging {
        /// What is being dragged.
        gesture: DragGesture,
        /// Current drop target, if any.
        target: Option<DropTarget>,
    },
}

/// Pointer-gesture state machine.
#[derive(Debug, Clone, Default)]
pub struct DragReorganizer {
    state: DragState,
}

impl DragReorganizer {
    /// Creates an idle reorganizer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Returns true while a gesture is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The gesture in progress.
    #[must_use]
    pub const fn gesture(&self) -> Option<DragGesture> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { gesture, .. } => Some(gesture),
        }
    }

    /// The drop target currently held.
    #[must_use]
    pub const fn drop_target(&self) -> Option<DropTarget> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { target, .. } => target,
        }
    }

    /// Starts a gesture. Ignored (returns false) if one is in progress.
    pub fn begin(&mut self, gesture: DragGesture) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging {
            gesture,
            target: None,
        };
        true
    }

    fn set_target(&mut self, new_target: Option<DropTarget>) {
        if let DragState::Dragging { target, .. } = &mut self.state {
            *target = new_target;
        }
    }

    /// Updates the target from the pointer over pane `pane_id`.
    ///
    /// Only pane gestures target panes, and never their own pane. A point
    /// outside `bounds` clears the target. Returns the classified edge.
    pub fn pointer_move(&mut self, pane_id: PaneId, bounds: Rect, point: Point) -> Option<Edge> {
        let Some(DragGesture::Pane(source)) = self.gesture() else {
            return None;
        };
        if source == pane_id || !bounds.contains(point) {
            self.set_target(None);
            return None;
        }
        let edge = calculate_edge_in(bounds, point);
        self.set_target(Some(DropTarget::Pane { pane_id, edge }));
        Some(edge)
    }

    /// Updates the target from the pointer anywhere over a tab's tree.
    ///
    /// Hit-tests the tree laid out in `bounds`, then behaves like
    /// [`pointer_move`](Self::pointer_move).
    pub fn pointer_over_tree(
        &mut self,
        tree: &PaneNode,
        bounds: Rect,
        point: Point,
    ) -> Option<(PaneId, Edge)> {
        match tree.leaf_at(bounds, point) {
            Some((pane_id, rect)) => self
                .pointer_move(pane_id, rect, point)
                .map(|edge| (pane_id, edge)),
            None => {
                self.set_target(None);
                None
            }
        }
    }

    /// The pointer left every drop zone.
    pub fn pointer_leave(&mut self) {
        self.set_target(None);
    }

    /// Pointer is over a tab header.
    ///
    /// Tab gestures target the hovered tab; pane gestures lose their pane
    /// target since the pointer has left the tree.
    pub fn hover_tab(&mut self, tab_id: TabId) {
        let target = match self.gesture() {
            Some(DragGesture::Tab(source)) => (source != tab_id).then_some(DropTarget::Tab(tab_id)),
            _ => None,
        };
        self.set_target(target);
    }

    /// Pointer is over a gap in the tab bar.
    pub fn hover_tab_slot(&mut self, index: usize) {
        if self.is_dragging() {
            self.set_target(Some(DropTarget::TabSlot(index)));
        }
    }

    /// Ends the gesture and returns the proposed action, if any.
    ///
    /// Always returns to `Idle`.
    pub fn drop_gesture(&mut self) -> Option<DropAction> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { gesture, target } = state else {
            return None;
        };
        let action = match (gesture, target?) {
            (DragGesture::Pane(source), DropTarget::Pane { pane_id, edge }) => {
                Some(DropAction::Reorganize {
                    source,
                    target: pane_id,
                    edge,
                })
            }
            (DragGesture::Pane(pane_id), DropTarget::TabSlot(_)) => {
                Some(DropAction::DetachPane(pane_id))
            }
            (DragGesture::Tab(source), DropTarget::Tab(target)) => {
                Some(DropAction::MergeTab { source, target })
            }
            (DragGesture::Tab(tab_id), DropTarget::TabSlot(index)) => {
                Some(DropAction::MoveTab { tab_id, index })
            }
            _ => None,
        };
        tracing::debug!(?action, "Drag gesture dropped");
        action
    }

    /// Aborts the gesture without an action.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
