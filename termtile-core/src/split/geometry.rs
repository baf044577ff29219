//! Pane rectangles
//!
//! Computes where each leaf sits inside the tab's bounds from the split
//! ratios. The drag reorganizer uses these boxes for edge classification.

use serde::{Deserialize, Serialize};

use super::tree::PaneNode;
use super::types::{PaneId, SplitAxis};

/// A point in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns true if the point lies inside or on the border.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Returns the point relative to the top-left corner.
    #[must_use]
    pub fn relative(&self, point: Point) -> Point {
        Point::new(point.x - self.x, point.y - self.y)
    }

    /// Divides the rectangle along `axis`, giving `ratio` to the first part.
    #[must_use]
    pub fn divide(&self, axis: SplitAxis, ratio: f64) -> (Self, Self) {
        match axis {
            SplitAxis::Horizontal => {
                let first = self.width * ratio;
                (
                    Self::new(self.x, self.y, first, self.height),
                    Self::new(self.x + first, self.y, self.width - first, self.height),
                )
            }
            SplitAxis::Vertical => {
                let first = self.height * ratio;
                (
                    Self::new(self.x, self.y, self.width, first),
                    Self::new(self.x, self.y + first, self.width, self.height - first),
                )
            }
        }
    }
}

impl PaneNode {
    /// Returns the rectangle of every leaf in pre-order.
    #[must_use]
    pub fn layout(&self, bounds: Rect) -> Vec<(PaneId, Rect)> {
        let mut out = Vec::with_capacity(self.leaf_count());
        self.collect_layout(bounds, &mut out);
        out
    }

    fn collect_layout(&self, bounds: Rect, out: &mut Vec<(PaneId, Rect)>) {
        match self {
            Self::Leaf(leaf) => out.push((leaf.id, bounds)),
            Self::Split(split) => {
                let (first, second) = bounds.divide(split.axis, split.ratio);
                split.first.collect_layout(first, out);
                split.second.collect_layout(second, out);
            }
        }
    }

    /// Returns the rectangle of one leaf.
    #[must_use]
    pub fn leaf_bounds(&self, bounds: Rect, pane_id: PaneId) -> Option<Rect> {
        self.layout(bounds)
            .into_iter()
            .find_map(|(id, rect)| (id == pane_id).then_some(rect))
    }

    /// Returns the leaf under `point`, with its rectangle.
    ///
    /// Points on a shared border resolve to the earlier leaf.
    #[must_use]
    pub fn leaf_at(&self, bounds: Rect, point: Point) -> Option<(PaneId, Rect)> {
        self.layout(bounds)
            .into_iter()
            .find(|(_, rect)| rect.contains(point))
    }
}
