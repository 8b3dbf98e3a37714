//! Drawing surface abstraction.

use crate::Rgba;

/// A 2D raster sized in logical pixels.
///
/// Renderers only talk to this trait, so they can be driven against the
/// terminal canvas or a recording test double alike.
pub trait Surface {
    /// Width in logical pixels.
    fn width(&self) -> f32;

    /// Height in logical pixels.
    fn height(&self) -> f32;

    /// Change the logical size. Existing content may be discarded.
    fn resize(&mut self, width: f32, height: f32);

    /// Erase everything.
    fn clear(&mut self);

    /// Composite a rectangle of `color` over the current content.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba);

    /// Draw one glyph with its top-left corner at `(x, y)`.
    fn fill_text(&mut self, glyph: char, x: f32, y: f32, color: Rgba);

    /// Draw a filled circle with a soft halo extending `glow` pixels past its edge.
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba, glow: f32);

    /// Stroke a straight line segment.
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba, width: f32);

    /// Overall opacity applied to the whole surface when it is shown.
    fn set_opacity(&mut self, opacity: f32);

    /// Current overall opacity.
    fn opacity(&self) -> f32;
}
