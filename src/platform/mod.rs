//! Platform abstraction layer
//!
//! The windowing layer hands the simulation:
//! - A per-frame snapshot of logical key states and the mouse
//! - Discrete text-entry events for the name field
//!
//! Edge detection is done on our side from level state.

use glam::Vec2;

/// Logical keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Reload,
    Dash,
    Confirm,
    AltFire,
}

impl Key {
    pub const COUNT: usize = 8;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Level-triggered input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    keys: [bool; Key::COUNT],
    /// Mouse position in screen space
    pub mouse: Vec2,
    /// Left mouse button held
    pub mouse_left: bool,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys[key.index()]
    }

    pub fn set(&mut self, key: Key, down: bool) {
        self.keys[key.index()] = down;
    }

    /// Builder-style helper
    pub fn with(mut self, key: Key) -> Self {
        self.set(key, true);
        self
    }

    pub fn with_mouse(mut self, pos: Vec2, left: bool) -> Self {
        self.mouse = pos;
        self.mouse_left = left;
        self
    }

    /// Raw WASD direction (not normalized)
    pub fn move_axis(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.is_down(Key::Up) {
            dir.y -= 1.0;
        }
        if self.is_down(Key::Down) {
            dir.y += 1.0;
        }
        if self.is_down(Key::Left) {
            dir.x -= 1.0;
        }
        if self.is_down(Key::Right) {
            dir.x += 1.0;
        }
        dir
    }

    /// Primary or alternate fire held
    pub fn fire_held(&self) -> bool {
        self.mouse_left || self.is_down(Key::AltFire)
    }
}

/// Name-entry events, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEvent {
    /// Typed characters (non-printable ones are dropped)
    Text(String),
    Backspace,
    /// Clear the whole name
    Clear,
}

/// Turns a held key into a single press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeLatch {
    prev: bool,
}

impl EdgeLatch {
    /// True only on the frame `now` goes from up to down
    pub fn pressed(&mut self, now: bool) -> bool {
        let pressed = now && !self.prev;
        self.prev = now;
        pressed
    }
}
