//! Geometric primitives: `Point`, `Rect`, and release containment.

use serde::{Deserialize, Serialize};

/// A pointer position in the host view's coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance travelled from `from` to this point.
    #[must_use]
    pub fn distance_from(self, from: Self) -> f32 {
        let (dx, dy) = (self.x - from.x, self.y - from.y);
        dx.mul_add(dx, dy * dy).sqrt()
    }
}

/// A rectangle defined by position and size.
///
/// Hosts usually pass their bounds in local coordinates, i.e. with the
/// origin at `(0, 0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: f32,
    /// Y position of top-left corner
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle of the given size anchored at the origin.
    #[must_use]
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point lies strictly inside the rectangle.
    ///
    /// Points on any edge are outside. For local bounds this means a release
    /// at a non-positive coordinate never counts as inside.
    #[must_use]
    pub fn contains_point_strict(&self, point: &Point) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }
}
