//! Screen region value type.
//!
//! A [`Region`] is an axis-aligned rectangle in screen pixel coordinates.  The
//! perception gate takes one as its search area and returns one as the bounds
//! of a located template.

use serde::{Deserialize, Serialize};

/// A rectangular region in screen coordinates.
///
/// `x` and `y` are the top-left corner; the right and bottom edges are
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    /// X coordinate of the top-left corner (may be negative on multi-monitor setups).
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the rightmost X coordinate (exclusive), clamped to `i32::MAX`.
    pub fn right(&self) -> i32 {
        clamped_edge(self.x, self.width)
    }

    /// Returns the bottommost Y coordinate (exclusive), clamped to `i32::MAX`.
    pub fn bottom(&self) -> i32 {
        clamped_edge(self.y, self.height)
    }

    /// Returns `true` if the point `(px, py)` lies inside this region.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns `true` if the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

fn clamped_edge(origin: i32, extent: u32) -> i32 {
    let edge = i64::from(origin) + i64::from(extent);
    i32::try_from(edge).unwrap_or(i32::MAX)
}
