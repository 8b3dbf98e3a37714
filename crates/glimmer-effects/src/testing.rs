//! Recording surface for renderer tests.

use glimmer_core::{Rgba, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Rect { x: f32, y: f32, w: f32, h: f32, color: Rgba },
    Text { glyph: char, x: f32, y: f32, color: Rgba },
    Circle { x: f32, y: f32, radius: f32, color: Rgba, glow: f32 },
    Line { from: (f32, f32), to: (f32, f32), color: Rgba, width: f32 },
}

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            opacity: 1.0,
            ops: Vec::new(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Text { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. }))
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    fn fill_text(&mut self, glyph: char, x: f32, y: f32, color: Rgba) {
        self.ops.push(DrawOp::Text { glyph, x, y, color });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba, glow: f32) {
        self.ops.push(DrawOp::Circle {
            x,
            y,
            radius,
            color,
            glow,
        });
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba, width: f32) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
}
