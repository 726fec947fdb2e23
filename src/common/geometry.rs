//! The rectangle a window was last laid out in.

use serde::{Deserialize, Serialize};

/// Differences below this many points are rounding noise from the window server.
const SAME_RECT_TOLERANCE: f64 = 0.1;

/// Axis-aligned rectangle in layout (virtual) coordinates, top-left origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    /// Wide or square rectangles are split side by side.
    pub fn is_wide(&self) -> bool { self.width >= self.height }

    pub fn same_as(&self, other: Rect) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() < SAME_RECT_TOLERANCE;
        close(self.x, other.x)
            && close(self.y, other.y)
            && close(self.width, other.width)
            && close(self.height, other.height)
    }
}
