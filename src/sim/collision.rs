//! Axis-aligned collision tests
//!
//! Every actor is a square given by its top-left corner and side length.
//! Projectiles are treated as points.

use glam::Vec2;

/// Axis-aligned square
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: f32,
}

impl Aabb {
    pub fn square(min: Vec2, size: f32) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + Vec2::splat(self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.min + Vec2::splat(self.size * 0.5)
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// Strict point containment (points on an edge are outside)
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x > self.min.x && p.x < max.x && p.y > self.min.y && p.y < max.y
    }
}

/// True if `p` lies outside the world expanded by `margin`
pub fn outside_world(p: Vec2, world: Vec2, margin: f32) -> bool {
    p.x < -margin || p.x > world.x + margin || p.y < -margin || p.y > world.y + margin
}
