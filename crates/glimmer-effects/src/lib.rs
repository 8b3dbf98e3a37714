//! Decorative backdrop effects for the glimmer terminal app.
//!
//! Provides two renderers, a falling glyph rain and an interactive particle
//! field, each driving its own [`Canvas`], plus the [`Backdrop`] that ticks
//! both and layers them into a ratatui frame.

mod animations;
mod canvas;
mod chars;
mod color;
mod state;
#[cfg(test)]
mod testing;

pub use animations::particles::{Particle, ParticleField};
pub use animations::rain::{Column, GlyphSlot, RainField};
pub use canvas::Canvas;
pub use chars::{MOON, SUN};
pub use color::{Palette, to_color};
pub use state::{Backdrop, BackdropOptions};
