//! Smoothed follow camera
//!
//! The camera position is the world-space top-left of the viewport. It eases
//! toward a target that centers the player and never shows outside the world.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::CAMERA_STIFFNESS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    pub target: Vec2,
}

impl Camera {
    /// Viewport origin centering `focus`, clamped so the view stays in the world.
    /// On an axis where the whole world fits on screen the origin is 0.
    pub fn target_for(focus: Vec2, screen: Vec2, world: Vec2) -> Vec2 {
        let raw = focus - screen * 0.5;
        let axis = |t: f32, screen: f32, world: f32| {
            if world <= screen {
                0.0
            } else {
                t.clamp(0.0, world - screen)
            }
        };
        Vec2::new(axis(raw.x, screen.x, world.x), axis(raw.y, screen.y, world.y))
    }

    /// Jump straight to the target (run start)
    pub fn snap(&mut self, focus: Vec2, screen: Vec2, world: Vec2) {
        self.target = Self::target_for(focus, screen, world);
        self.pos = self.target;
    }

    /// Exponential ease toward the target, frame-rate independent
    pub fn follow(&mut self, focus: Vec2, screen: Vec2, world: Vec2, dt: f32) {
        self.target = Self::target_for(focus, screen, world);
        let a = 1.0 - (-CAMERA_STIFFNESS * dt).exp();
        self.pos += (self.target - self.pos) * a;
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p - self.pos
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        p + self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);
    const WORLD: Vec2 = Vec2::new(2400.0, 2400.0);

    #[test]
    fn test_target_clamped_to_world() {
        assert_eq!(Camera::target_for(Vec2::new(10.0, 10.0), SCREEN, WORLD), Vec2::ZERO);
        assert_eq!(
            Camera::target_for(Vec2::new(2390.0, 2390.0), SCREEN, WORLD),
            Vec2::new(1600.0, 1800.0)
        );
        assert_eq!(
            Camera::target_for(Vec2::new(1200.0, 1200.0), SCREEN, WORLD),
            Vec2::new(800.0, 900.0)
        );
    }

    #[test]
    fn test_small_world_pins_origin() {
        let world = Vec2::new(600.0, 2400.0);
        let t = Camera::target_for(Vec2::new(500.0, 1200.0), SCREEN, world);
        assert_eq!(t, Vec2::new(0.0, 900.0));
    }

    #[test]
    fn test_follow_converges() {
        let mut cam = Camera::default();
        let focus = Vec2::new(1200.0, 1200.0);
        let mut last_gap = f32::MAX;
        for _ in 0..120 {
            cam.follow(focus, SCREEN, WORLD, 1.0 / 60.0);
            let gap = cam.pos.distance(cam.target);
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1.0);
    }

    #[test]
    fn test_screen_world_roundtrip() {
        let mut cam = Camera::default();
        cam.snap(Vec2::new(1200.0, 1200.0), SCREEN, WORLD);
        let p = Vec2::new(37.0, 410.0);
        assert_eq!(cam.world_to_screen(cam.screen_to_world(p)), p);
    }
}
