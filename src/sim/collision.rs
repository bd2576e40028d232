//! Axis-aligned overlap tests
//!
//! Hearts and the basket are both treated as rectangles. Edges count as
//! touching, so a heart resting exactly on the basket rim is caught.

use glam::Vec2;

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Inclusive overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        a_max.y >= other.min.y
            && self.min.y <= b_max.y
            && a_max.x >= other.min.x
            && self.min.x <= b_max.x
    }
}
