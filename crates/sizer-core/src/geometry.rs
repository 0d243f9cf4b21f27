//! Geometric primitives in integer pixel units: Point, Size, Rect, `Borders`.

use crate::align::Axis;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate along the given axis.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Build a point from a growth-axis coordinate and a cross-axis coordinate.
    #[must_use]
    pub const fn from_axes(axis: Axis, growth: i32, cross: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(growth, cross),
            Axis::Vertical => Self::new(cross, growth),
        }
    }

    /// Move the point along one axis.
    #[must_use]
    pub const fn offset_along(&self, axis: Axis, delta: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(self.x + delta, self.y),
            Axis::Vertical => Self::new(self.x, self.y + delta),
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D size with width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Length along the given axis.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Copy of this size with the length along `axis` replaced.
    #[must_use]
    pub const fn with_along(&self, axis: Axis, length: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(length, self.height),
            Axis::Vertical => Self::new(self.width, length),
        }
    }

    /// Build a size from a growth-axis length and a cross-axis length.
    #[must_use]
    pub const fn from_axes(axis: Axis, growth: i32, cross: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(growth, cross),
            Axis::Vertical => Self::new(cross, growth),
        }
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Calculate area.
    #[must_use]
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// Check if this size can contain another size.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: i32,
    /// Y position of top-left corner
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from an origin and a size.
    #[must_use]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Create from size at origin.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Get the origin (top-left) point.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the size.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle (inclusive).
    #[must_use]
    pub const fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle.
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if this rectangle intersects another.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

/// Border insets placed around a payload, in `(left, right, bottom, top)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Borders {
    /// Left inset
    pub left: i32,
    /// Right inset
    pub right: i32,
    /// Bottom inset
    pub bottom: i32,
    /// Top inset
    pub top: i32,
}

impl Borders {
    /// No insets
    pub const ZERO: Self = Self {
        left: 0,
        right: 0,
        bottom: 0,
        top: 0,
    };

    /// Create insets with individual values.
    #[must_use]
    pub const fn new(left: i32, right: i32, bottom: i32, top: i32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Same inset on every side.
    #[must_use]
    pub const fn uniform(inset: i32) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// Sum of the left and right insets.
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Sum of the bottom and top insets.
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.bottom + self.top
    }

    /// Size of a payload grown by these insets.
    #[must_use]
    pub const fn outer(&self, inner: Size) -> Size {
        Size::new(
            inner.width + self.horizontal(),
            inner.height + self.vertical(),
        )
    }

    /// Size left for a payload once these insets are taken out of `outer`.
    #[must_use]
    pub fn inner(&self, outer: Size) -> Size {
        Size::new(
            (outer.width - self.horizontal()).max(0),
            (outer.height - self.vertical()).max(0),
        )
    }

    /// Offset of the payload's top-left corner.
    #[must_use]
    pub const fn offset(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Check if all insets are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0 && self.bottom == 0 && self.top == 0
    }
}

impl From<(i32, i32, i32, i32)> for Borders {
    fn from((left, right, bottom, top): (i32, i32, i32, i32)) -> Self {
        Self::new(left, right, bottom, top)
    }
}
