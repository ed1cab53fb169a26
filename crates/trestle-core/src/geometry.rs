//! Geometric primitives for railroad layout.
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Extent`] - The footprint of an element laid along a horizontal track
//!
//! # Coordinate System
//!
//! Coordinates follow SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Every railroad element is entered on the left and left on the right at the
//! same height, the *track*. An [`Extent`] measures how far the element
//! reaches above (`up`) and below (`down`) that track.

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use trestle_core::geometry::Point;
/// let p = Point::new(10.0, 20.0).right(5.0).down(-8.0);
/// assert_eq!(p.x(), 15.0);
/// assert_eq!(p.y(), 12.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Moves the point right by `dx`.
    pub fn right(self, dx: f32) -> Self {
        self.with_x(self.x + dx)
    }

    /// Moves the point down by `dy`. Negative values move up.
    pub fn down(self, dy: f32) -> Self {
        self.with_y(self.y + dy)
    }
}

/// Width and height dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }
}

/// Footprint of a railroad element around its track line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    width: f32,
    up: f32,
    down: f32,
}

impl Extent {
    pub fn new(width: f32, up: f32, down: f32) -> Self {
        Self { width, up, down }
    }

    /// Horizontal length along the track
    pub fn width(self) -> f32 {
        self.width
    }

    /// Distance from the track to the top edge
    pub fn up(self) -> f32 {
        self.up
    }

    /// Distance from the track to the bottom edge
    pub fn down(self) -> f32 {
        self.down
    }

    /// Total vertical size: `up + down`
    pub fn height(self) -> f32 {
        self.up + self.down
    }

    /// Place `other` after this extent on the same track.
    pub fn then(self, other: Extent) -> Self {
        Self {
            width: self.width + other.width,
            up: self.up.max(other.up),
            down: self.down.max(other.down),
        }
    }
}
