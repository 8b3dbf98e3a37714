//! Falling glyph rain (stateful).

use std::ops::Range;

use glimmer_core::{FrameLoop, Renderer, Surface, Theme};
use rand::{Rng, rngs::StdRng};

use crate::chars::RAIN_GLYPHS;
use crate::color::{RAIN_ACCENT, RAIN_FADE};

/// Size of one glyph cell in logical pixels.
pub const CELL_SIZE: f32 = 14.0;

/// Column speed range in pixels per frame.
pub const SPEED_RANGE: Range<f32> = 3.0..10.0;

/// Trail length range in glyphs.
pub const TRAIL_RANGE: Range<usize> = 5..25;

/// Probability that a visible glyph keeps its character in a frame.
pub const DENSITY: f64 = 0.95;

/// How far below the bottom edge a trail must scroll before its column resets.
const RESET_MARGIN: f32 = 200.0;

/// Glyphs are updated and drawn between these margins around the surface.
const DRAW_MARGIN_ABOVE: f32 = 200.0;
const DRAW_MARGIN_BELOW: f32 = 100.0;

/// Surface opacity per theme.
const DARK_OPACITY: f32 = 0.4;
const LIGHT_OPACITY: f32 = 0.2;

/// One character position within a trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphSlot {
    pub glyph: char,
    pub opacity: f32,
}

/// State for a single rain column.
#[derive(Debug, Clone)]
pub struct Column {
    /// Left edge of the lane.
    pub x: f32,
    /// Position of the trail head.
    pub y: f32,
    /// Pixels advanced per frame.
    pub speed: f32,
    /// Head first.
    pub trail: Vec<GlyphSlot>,
}

impl Column {
    fn spawn<R: Rng>(rng: &mut R, x: f32, max_offset: f32) -> Self {
        let mut column = Self {
            x,
            y: 0.0,
            speed: 0.0,
            trail: Vec::new(),
        };
        column.reroll(rng, max_offset);
        column
    }

    /// Fresh offset in `(-max_offset, 0]`, speed, length and glyphs.
    fn reroll<R: Rng>(&mut self, rng: &mut R, max_offset: f32) {
        self.y = -rng.random::<f32>() * max_offset;
        self.speed = rng.random_range(SPEED_RANGE);
        let len = rng.random_range(TRAIL_RANGE);
        self.trail = (0..len)
            .map(|i| GlyphSlot {
                glyph: random_glyph(rng),
                opacity: slot_opacity(i, len),
            })
            .collect();
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Whether the whole trail has left the surface by the reset margin.
    fn is_spent(&self, height: f32) -> bool {
        self.y - self.trail.len() as f32 * CELL_SIZE > height + RESET_MARGIN
    }
}

fn random_glyph<R: Rng>(rng: &mut R) -> char {
    RAIN_GLYPHS[rng.random_range(0..RAIN_GLYPHS.len())]
}

/// Opacity of slot `index` in a trail of `len` glyphs.
pub fn slot_opacity(index: usize, len: usize) -> f32 {
    if index == 0 {
        0.8
    } else {
        (1.0 - index as f32 / len.max(1) as f32).max(0.0) * 0.5
    }
}

/// Alpha a slot is painted with: head, near-head and trail tiers.
pub fn paint_alpha(index: usize, opacity: f32) -> f32 {
    match index {
        0 => (opacity * 1.2).min(0.9),
        1 | 2 => (opacity * 0.9).min(0.7),
        _ => (opacity * 0.6).min(0.5),
    }
}

/// Number of lanes that fit in `width`.
pub fn column_count(width: f32) -> usize {
    (width.max(0.0) / CELL_SIZE).floor() as usize
}

/// Falling glyph trails, one per 14 px lane.
#[derive(Debug)]
pub struct RainField<S, R = StdRng> {
    surface: S,
    rng: R,
    columns: Vec<Column>,
    frames: FrameLoop,
}

impl<S: Surface, R: Rng> RainField<S, R> {
    /// Lay out columns across `surface`. Returns `None` when there is no surface.
    ///
    /// The loop starts disarmed; call [`Renderer::start`] to begin.
    pub fn attach(surface: Option<S>, theme: Theme, mut rng: R) -> Option<Self> {
        let Some(surface) = surface else {
            tracing::debug!("rain surface missing, skipping");
            return None;
        };
        let height = surface.height();
        let columns = (0..column_count(surface.width()))
            .map(|i| Column::spawn(&mut rng, i as f32 * CELL_SIZE, height))
            .collect::<Vec<_>>();
        tracing::debug!(columns = columns.len(), "rain initialized");

        let mut field = Self {
            surface,
            rng,
            columns,
            frames: FrameLoop::new(),
        };
        field.on_theme_change(theme);
        Some(field)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Append lanes for a wider surface or drop lanes past a narrower one.
    fn reconcile_columns(&mut self) {
        let wanted = column_count(self.surface.width());
        let height = self.surface.height();
        if wanted < self.columns.len() {
            self.columns.truncate(wanted);
        } else {
            for i in self.columns.len()..wanted {
                let column = Column::spawn(&mut self.rng, i as f32 * CELL_SIZE, height);
                self.columns.push(column);
            }
        }
    }
}

impl<S: Surface, R: Rng> Renderer for RainField<S, R> {
    fn render_frame(&mut self) {
        let width = self.surface.width();
        let height = self.surface.height();

        self.surface.fill_rect(0.0, 0.0, width, height, RAIN_FADE);

        for column in &mut self.columns {
            column.y += column.speed;
            if column.is_spent(height) {
                column.reroll(&mut self.rng, RESET_MARGIN);
            }

            let len = column.trail.len();
            for (i, slot) in column.trail.iter_mut().enumerate() {
                let y = column.y - i as f32 * CELL_SIZE;
                if y <= -DRAW_MARGIN_ABOVE || y >= height + DRAW_MARGIN_BELOW {
                    continue;
                }
                if !self.rng.random_bool(DENSITY) {
                    slot.glyph = random_glyph(&mut self.rng);
                }
                slot.opacity = slot_opacity(i, len);
                let color = RAIN_ACCENT.with_alpha(paint_alpha(i, slot.opacity));
                self.surface.fill_text(slot.glyph, column.x, y, color);
            }
        }
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.surface.resize(width, height);
        let before = self.columns.len();
        self.reconcile_columns();
        if before != self.columns.len() {
            tracing::debug!(before, after = self.columns.len(), "rain columns reconciled");
        }
    }

    fn on_theme_change(&mut self, theme: Theme) {
        let opacity = match theme {
            Theme::Dark => DARK_OPACITY,
            Theme::Light => LIGHT_OPACITY,
        };
        self.surface.set_opacity(opacity);
    }

    fn frame_loop(&self) -> &FrameLoop {
        &self.frames
    }

    fn frame_loop_mut(&mut self) -> &mut FrameLoop {
        &mut self.frames
    }
}
