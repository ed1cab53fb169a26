//! Builder for SVG path data made of straight runs and quarter-circle turns.

use std::fmt::Write as _;

use crate::geometry::Point;

/// Direction of a quarter turn, seen from the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    /// SVG arc sweep flag. The y axis points down, so a right turn is clockwise.
    fn sweep(self) -> u8 {
        match self {
            Turn::Left => 0,
            Turn::Right => 1,
        }
    }
}

/// Relative path data starting at an absolute point.
#[derive(Debug, Clone)]
pub struct PathData {
    data: String,
}

impl PathData {
    pub fn start(at: Point) -> Self {
        Self {
            data: format!("M{} {}", at.x(), at.y()),
        }
    }

    /// Horizontal run by `dx`.
    pub fn h(mut self, dx: f32) -> Self {
        if dx != 0.0 {
            let _ = write!(self.data, " h{dx}");
        }
        self
    }

    /// Vertical run by `dy`.
    pub fn v(mut self, dy: f32) -> Self {
        if dy != 0.0 {
            let _ = write!(self.data, " v{dy}");
        }
        self
    }

    /// Quarter circle ending `(dx, dy)` away, turning `turn`. The radius is `|dx|`.
    pub fn arc(mut self, dx: f32, dy: f32, turn: Turn) -> Self {
        let radius = dx.abs();
        let _ = write!(
            self.data,
            " a{radius} {radius} 0 0 {} {dx} {dy}",
            turn.sweep()
        );
        self
    }

    pub fn finish(self) -> String {
        self.data
    }
}
