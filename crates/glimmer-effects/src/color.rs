//! Theme palettes and color conversion.

use glimmer_core::{Rgba, Theme};
use rand::Rng;
use ratatui::style::Color;

/// Accent color of the rain glyphs.
pub const RAIN_ACCENT: Rgba = Rgba::rgb(29, 185, 84);

/// Translucent overlay painted over the rain every frame.
pub const RAIN_FADE: Rgba = Rgba::rgba(18, 18, 18, 0.05);

/// Colors used by one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// First particle accent.
    pub primary: Rgba,
    /// Second particle accent.
    pub secondary: Rgba,
    /// Connection line color; alpha is set per line.
    pub line: Rgba,
    /// Color the surfaces are composited onto.
    pub background: Rgba,
}

const DARK: Palette = Palette {
    primary: Rgba::rgba(0, 217, 255, 0.6),
    secondary: Rgba::rgba(255, 61, 113, 0.6),
    line: Rgba::rgba(0, 217, 255, 0.15),
    background: Rgba::rgb(18, 18, 18),
};

const LIGHT: Palette = Palette {
    primary: Rgba::rgba(0, 153, 204, 0.6),
    secondary: Rgba::rgba(216, 27, 96, 0.6),
    line: Rgba::rgba(0, 153, 204, 0.1),
    background: Rgba::rgb(245, 245, 245),
};

impl Palette {
    /// Palette for `theme`.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => DARK,
            Theme::Light => LIGHT,
        }
    }

    /// Either accent, with equal probability.
    pub fn pick_accent<R: Rng>(&self, rng: &mut R) -> Rgba {
        if rng.random_bool(0.5) {
            self.primary
        } else {
            self.secondary
        }
    }

    /// Whether `color` is one of this palette's accents.
    pub fn is_accent(&self, color: Rgba) -> bool {
        color == self.primary || color == self.secondary
    }
}

/// Terminal color for `color`, ignoring alpha.
pub fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Composite `color` over an opaque `base` and convert for the terminal.
pub fn composite(base: Rgba, color: Rgba, alpha: f32) -> Color {
    to_color(base.mix(color, alpha))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_palettes_differ_by_theme() {
        assert_ne!(Palette::for_theme(Theme::Dark), Palette::for_theme(Theme::Light));
    }

    #[test]
    fn test_pick_accent_uses_both_colors() {
        let palette = Palette::for_theme(Theme::Dark);
        let mut rng = StdRng::seed_from_u64(3);
        let picks: Vec<Rgba> = (0..64).map(|_| palette.pick_accent(&mut rng)).collect();
        assert!(picks.iter().all(|c| palette.is_accent(*c)));
        assert!(picks.contains(&palette.primary));
        assert!(picks.contains(&palette.secondary));
    }

    #[test]
    fn test_composite() {
        let base = Rgba::rgb(0, 0, 0);
        assert_eq!(composite(base, RAIN_ACCENT, 1.0), Color::Rgb(29, 185, 84));
        assert_eq!(composite(base, RAIN_ACCENT, 0.0), Color::Rgb(0, 0, 0));
    }
}
