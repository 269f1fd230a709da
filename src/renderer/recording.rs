//! Surface that records draw calls instead of rasterizing them
//!
//! Used by the headless driver and by tests to inspect a frame.

use glam::Vec2;

use super::{Rgba, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Color(Rgba),
    Fill { pos: Vec2, size: Vec2 },
    Outline { pos: Vec2, size: Vec2 },
    Text { pos: Vec2, text: String },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop the previous frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, text: &str) -> bool {
        self.texts().any(|t| t == text)
    }

    pub fn has_text_containing(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

impl Surface for RecordingSurface {
    fn set_draw_color(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Color(color));
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::Fill { pos, size });
    }

    fn draw_rect(&mut self, pos: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::Outline { pos, size });
    }

    fn draw_text(&mut self, pos: Vec2, text: &str) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
        });
    }
}
