//! Axis-aligned rectangle tests
//!
//! Collision runs in two passes: a broad phase over the full visual bounds
//! of each actor, then a narrow phase over the inset hit-boxes.

use glam::Vec2;

/// Axis-aligned rectangle (min corner inclusive, max corner exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Rectangle shrunk by `margin * size` on every side
    pub fn inset(pos: Vec2, size: Vec2, margin: f32) -> Self {
        let pad = size * margin;
        Self {
            min: pos + pad,
            max: pos + size - pad,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Separating-axis rejection on all four sides
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.max.x <= other.min.x
            || other.max.x <= self.min.x
            || self.max.y <= other.min.y
            || other.max.y <= self.min.y)
    }
}
