//! Core types shared by the glimmer crates.
//!
//! Holds the theme state, the color type, the drawing [`Surface`] abstraction
//! and the [`FrameLoop`] that drives every renderer.

mod color;
mod frame_loop;
mod surface;
mod theme;

pub use color::Rgba;
pub use frame_loop::{FrameLoop, Renderer};
pub use surface::Surface;
pub use theme::{ParseThemeError, Theme, ThemeState};

/// Upper bound on the particle count.
///
/// Connections are computed pairwise every frame, so the field stays small.
pub const MAX_PARTICLES: usize = 2000;
