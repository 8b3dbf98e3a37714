//! Terminal cell raster implementing [`Surface`].
//!
//! Drawing commands arrive in logical pixels. Each terminal cell covers a
//! `cell_width x cell_height` block of them and keeps one glyph, the ink it
//! was drawn with, and an optional halo shown as the cell background.

use glimmer_core::{Rgba, Surface};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::chars::{LINE_GLYPHS, PARTICLE_LARGE, PARTICLE_SMALL};
use crate::color::composite;

/// Ink closer than this to an overlay color counts as faded out.
///
/// Rounding stalls an overlay of alpha `a` about `0.5 / a` channel steps short
/// of its color, so this must stay above 10 for the rain's 0.05 overlay.
const FADE_THRESHOLD: u8 = 12;

/// Radius at which particles switch to the large glyph.
const LARGE_PARTICLE_RADIUS: f32 = 3.5;

/// Fraction of a circle's alpha given to its halo.
const HALO_STRENGTH: f32 = 0.25;

const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    ink: Rgba,
    halo: Rgba,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        ink: TRANSPARENT,
        halo: TRANSPARENT,
    };

    fn is_visible(&self) -> bool {
        self.glyph != ' ' || self.halo.a > 0.0
    }
}

/// Source-over compositing with straight alpha.
fn over(dst: Rgba, src: Rgba) -> Rgba {
    let a = src.a + dst.a * (1.0 - src.a);
    if a <= 0.0 {
        return TRANSPARENT;
    }
    dst.mix(src, src.a / a).with_alpha(a)
}

/// A drawing surface backed by terminal cells.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f32,
    height: f32,
    cell_width: f32,
    cell_height: f32,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    /// Opaque color the canvas is composited onto when shown.
    backdrop: Rgba,
    opacity: f32,
}

impl Canvas {
    /// Create a canvas of `width x height` logical pixels.
    pub fn new(width: f32, height: f32, cell_width: f32, cell_height: f32) -> Self {
        let mut canvas = Self {
            width: 0.0,
            height: 0.0,
            cell_width: cell_width.max(1.0),
            cell_height: cell_height.max(1.0),
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            backdrop: Rgba::rgb(0, 0, 0),
            opacity: 1.0,
        };
        canvas.resize(width, height);
        canvas
    }

    /// Create a canvas covering `cols x rows` terminal cells.
    pub fn for_cells(cols: u16, rows: u16, cell_width: f32, cell_height: f32) -> Self {
        Self::new(
            f32::from(cols) * cell_width,
            f32::from(rows) * cell_height,
            cell_width,
            cell_height,
        )
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Set the color the canvas is composited onto.
    pub fn set_backdrop(&mut self, color: Rgba) {
        self.backdrop = color.with_alpha(1.0);
    }

    pub fn backdrop(&self) -> Rgba {
        self.backdrop
    }

    /// Glyph at a terminal cell, `' '` when blank or out of range.
    pub fn glyph_at(&self, col: u16, row: u16) -> char {
        self.cell(col, row).map_or(' ', |c| c.glyph)
    }

    #[cfg(test)]
    fn halo_at(&self, col: u16, row: u16) -> Option<Rgba> {
        self.cell(col, row).map(|c| c.halo)
    }

    #[cfg(test)]
    fn glyph_count(&self) -> usize {
        self.cells.iter().filter(|c| c.glyph != ' ').count()
    }

    /// Terminal cell containing a logical point.
    pub fn cell_of(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let inside = (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y);
        if !inside || self.cols == 0 || self.rows == 0 {
            return None;
        }
        // The far edges belong to the last cell.
        let col = (x / self.cell_width).floor().min(f32::from(self.cols - 1));
        let row = (y / self.cell_height).floor().min(f32::from(self.rows - 1));
        Some((col as u16, row as u16))
    }

    /// Logical centre of a terminal cell.
    pub fn center_of(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (f32::from(col) + 0.5) * self.cell_width,
            (f32::from(row) + 0.5) * self.cell_height,
        )
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        (col < self.cols && row < self.rows)
            .then(|| usize::from(row) * usize::from(self.cols) + usize::from(col))
    }

    fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        self.index(col, row).map(|i| &mut self.cells[i])
    }

    /// Inclusive range of cells overlapping `[start, end)` on one axis.
    fn span(start: f32, end: f32, cell: f32, limit: u16) -> Option<(u16, u16)> {
        let first = (start / cell).floor().max(0.0);
        let last = ((end / cell).ceil() - 1.0).min(f32::from(limit) - 1.0);
        if limit == 0 || !first.is_finite() || !last.is_finite() || last < first {
            return None;
        }
        Some((first as u16, last as u16))
    }
}

impl Surface for Canvas {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.cols = (self.width / self.cell_width).ceil().min(f32::from(u16::MAX)) as u16;
        self.rows = (self.height / self.cell_height).ceil().min(f32::from(u16::MAX)) as u16;
        self.cells = vec![Cell::BLANK; usize::from(self.cols) * usize::from(self.rows)];
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        let Some((c0, c1)) = Self::span(x, x + width, self.cell_width, self.cols) else {
            return;
        };
        let Some((r0, r1)) = Self::span(y, y + height, self.cell_height, self.rows) else {
            return;
        };
        for row in r0..=r1 {
            for col in c0..=c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ink = over(cell.ink, color);
                    cell.halo = over(cell.halo, color);
                    if cell.ink.distance(color) <= FADE_THRESHOLD {
                        cell.glyph = ' ';
                    }
                    if cell.halo.distance(color) <= FADE_THRESHOLD {
                        cell.halo = TRANSPARENT;
                    }
                }
            }
        }
    }

    fn fill_text(&mut self, glyph: char, x: f32, y: f32, color: Rgba) {
        let Some((col, row)) = self.cell_of(x, y) else {
            return;
        };
        if let Some(cell) = self.cell_mut(col, row) {
            cell.glyph = glyph;
            cell.ink = over(cell.ink, color);
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba, glow: f32) {
        let Some((col, row)) = self.cell_of(x, y) else {
            return;
        };
        let reach = radius + glow.max(0.0);
        let halo = color.with_alpha(color.a * HALO_STRENGTH);

        if glow > 0.0 {
            let cols = Self::span(x - reach, x + reach, self.cell_width, self.cols);
            let rows = Self::span(y - reach, y + reach, self.cell_height, self.rows);
            if let (Some((c0, c1)), Some((r0, r1))) = (cols, rows) {
                for r in r0..=r1 {
                    for c in c0..=c1 {
                        let (cx, cy) = self.center_of(c, r);
                        if (cx - x).hypot(cy - y) <= reach
                            && let Some(cell) = self.cell_mut(c, r)
                        {
                            cell.halo = over(cell.halo, halo);
                        }
                    }
                }
            }
        }

        let glyph = if radius >= LARGE_PARTICLE_RADIUS {
            PARTICLE_LARGE
        } else {
            PARTICLE_SMALL
        };
        if let Some(cell) = self.cell_mut(col, row) {
            cell.glyph = glyph;
            cell.ink = over(cell.ink, color);
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba, width: f32) {
        if width <= 0.0 {
            return;
        }
        let dx = (to.0 - from.0) / self.cell_width;
        let dy = (to.1 - from.1) / self.cell_height;
        let glyph = if dy.abs() < dx.abs() * 0.4 {
            LINE_GLYPHS[0]
        } else if dx.abs() < dy.abs() * 0.4 {
            LINE_GLYPHS[1]
        } else if (dx > 0.0) == (dy > 0.0) {
            LINE_GLYPHS[2]
        } else {
            LINE_GLYPHS[3]
        };

        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let px = from.0 + (to.0 - from.0) * t;
            let py = from.1 + (to.1 - from.1) * t;
            let Some((col, row)) = self.cell_of(px, py) else {
                continue;
            };
            if let Some(cell) = self.cell_mut(col, row) {
                // Lines never cover text or particles.
                if cell.glyph == ' ' || LINE_GLYPHS.contains(&cell.glyph) {
                    cell.glyph = glyph;
                    cell.ink = over(cell.ink, color);
                }
            }
        }
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// Blank cells are left untouched so canvases can be layered.
impl Widget for &Canvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);
        for row in 0..rows {
            for col in 0..cols {
                let Some(cell) = self.cell(col, row) else {
                    continue;
                };
                if !cell.is_visible() {
                    continue;
                }
                let Some(target) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                if cell.halo.a > 0.0 {
                    target.set_bg(composite(
                        self.backdrop,
                        cell.halo,
                        cell.halo.a * self.opacity,
                    ));
                }
                if cell.glyph != ' ' {
                    target.set_char(cell.glyph).set_fg(composite(
                        self.backdrop,
                        cell.ink,
                        cell.ink.a * self.opacity,
                    ));
                }
            }
        }
    }
}
