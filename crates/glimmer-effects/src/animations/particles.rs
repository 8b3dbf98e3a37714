//! Interactive particle field (stateful).

use glimmer_core::{FrameLoop, MAX_PARTICLES, Renderer, Rgba, Surface, Theme};
use rand::{Rng, rngs::StdRng};

use crate::color::Palette;

/// Particles created when no count is configured.
pub const DEFAULT_COUNT: usize = 80;

/// Pairs closer than this are joined by a line.
pub const CONNECT_DISTANCE: f32 = 150.0;

/// Alpha of a line between coincident particles.
const MAX_LINE_ALPHA: f32 = 0.3;

const LINE_WIDTH: f32 = 0.5;

/// Pointer influence radius in pixels.
pub const POINTER_RADIUS: f32 = 100.0;

/// Velocity nudge per pixel of pointer displacement, per frame.
pub const POINTER_PULL: f32 = 0.0001;

/// Halo radius around every particle.
const GLOW: f32 = 10.0;

/// Initial velocity components are drawn from `(-MAX_SPEED, MAX_SPEED)`.
const MAX_SPEED: f32 = 0.6;

/// Particle radius is drawn from `[MIN_RADIUS, MIN_RADIUS + RADIUS_SPREAD)`.
const MIN_RADIUS: f32 = 2.0;
const RADIUS_SPREAD: f32 = 3.0;

/// A moving point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub color: Rgba,
}

impl Particle {
    fn spawn<R: Rng>(rng: &mut R, width: f32, height: f32, palette: &Palette) -> Self {
        Self {
            x: rng.random::<f32>() * width,
            y: rng.random::<f32>() * height,
            vx: (rng.random::<f32>() - 0.5) * 2.0 * MAX_SPEED,
            vy: (rng.random::<f32>() - 0.5) * 2.0 * MAX_SPEED,
            radius: MIN_RADIUS + rng.random::<f32>() * RADIUS_SPREAD,
            color: palette.pick_accent(rng),
        }
    }

    /// Integrate one step, reflecting off and clamping to `[0, width] x [0, height]`.
    fn advance(&mut self, width: f32, height: f32) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x < 0.0 || self.x > width {
            self.vx = -self.vx;
        }
        if self.y < 0.0 || self.y > height {
            self.vy = -self.vy;
        }

        self.x = self.x.clamp(0.0, width);
        self.y = self.y.clamp(0.0, height);
    }

    /// Accumulate a velocity nudge toward a nearby pointer.
    fn pull_toward(&mut self, (px, py): (f32, f32)) {
        let dx = px - self.x;
        let dy = py - self.y;
        if dx.hypot(dy) < POINTER_RADIUS {
            self.vx += dx * POINTER_PULL;
            self.vy += dy * POINTER_PULL;
        }
    }
}

/// Alpha of the line joining two particles `distance` apart, `None` when too far.
pub fn connection_alpha(distance: f32) -> Option<f32> {
    (distance < CONNECT_DISTANCE).then(|| (1.0 - distance / CONNECT_DISTANCE) * MAX_LINE_ALPHA)
}

/// Bouncing particles with connecting lines and pointer attraction.
#[derive(Debug)]
pub struct ParticleField<S, R = StdRng> {
    surface: S,
    rng: R,
    particles: Vec<Particle>,
    /// Cardinality kept across theme resets.
    count: usize,
    theme: Theme,
    /// Last known pointer position; `None` disables attraction.
    pointer: Option<(f32, f32)>,
    frames: FrameLoop,
}

impl<S: Surface, R: Rng> ParticleField<S, R> {
    /// Populate `count` particles on `surface`. Returns `None` when there is no surface.
    ///
    /// `count` is capped at [`MAX_PARTICLES`].
    pub fn attach(surface: Option<S>, count: usize, theme: Theme, rng: R) -> Option<Self> {
        let Some(surface) = surface else {
            tracing::debug!("particle surface missing, skipping");
            return None;
        };
        if count > MAX_PARTICLES {
            tracing::warn!(count, max = MAX_PARTICLES, "particle count capped");
        }
        let count = count.min(MAX_PARTICLES);
        let mut field = Self {
            surface,
            rng,
            particles: Vec::with_capacity(count),
            count,
            theme,
            pointer: None,
            frames: FrameLoop::new(),
        };
        field.populate();
        tracing::debug!(count, "particles initialized");
        Some(field)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    /// Record the latest pointer position, or `None` when it left.
    pub fn set_pointer(&mut self, pointer: Option<(f32, f32)>) {
        self.pointer = pointer;
    }

    /// Replace every particle with a fresh random one.
    fn populate(&mut self) {
        let palette = Palette::for_theme(self.theme);
        let width = self.surface.width();
        let height = self.surface.height();
        self.particles.clear();
        for _ in 0..self.count {
            let particle = Particle::spawn(&mut self.rng, width, height, &palette);
            self.particles.push(particle);
        }
    }

    fn update(&mut self) {
        let palette = Palette::for_theme(self.theme);
        let width = self.surface.width();
        let height = self.surface.height();

        for particle in &mut self.particles {
            particle.advance(width, height);
            particle.color = palette.pick_accent(&mut self.rng);
            if let Some(pointer) = self.pointer {
                particle.pull_toward(pointer);
            }
        }
    }

    fn draw_connections(&mut self) {
        let line = Palette::for_theme(self.theme).line;
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = (a.x - b.x).hypot(a.y - b.y);
                if let Some(alpha) = connection_alpha(distance) {
                    self.surface.stroke_line(
                        (a.x, a.y),
                        (b.x, b.y),
                        line.with_alpha(alpha),
                        LINE_WIDTH,
                    );
                }
            }
        }
    }
}

impl<S: Surface, R: Rng> Renderer for ParticleField<S, R> {
    fn render_frame(&mut self) {
        self.surface.clear();
        self.update();
        self.draw_connections();
        for p in &self.particles {
            self.surface.fill_circle(p.x, p.y, p.radius, p.color, GLOW);
        }
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.surface.resize(width, height);
    }

    fn on_theme_change(&mut self, theme: Theme) {
        self.theme = theme;
        self.populate();
        tracing::debug!(%theme, count = self.particles.len(), "particles regenerated");
    }

    fn frame_loop(&self) -> &FrameLoop {
        &self.frames
    }

    fn frame_loop_mut(&mut self) -> &mut FrameLoop {
        &mut self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawOp, RecordingSurface};
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn field(count: usize, seed: u64) -> ParticleField<RecordingSurface, StdRng> {
        ParticleField::attach(
            Some(RecordingSurface::new(800.0, 600.0)),
            count,
            Theme::Dark,
            StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    fn still(x: f32, y: f32) -> Particle {
        Particle {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius: 3.0,
            color: Palette::for_theme(Theme::Dark).primary,
        }
    }

    #[test]
    fn test_missing_surface_skips_initialization() {
        let field = ParticleField::<RecordingSurface, _>::attach(
            None,
            DEFAULT_COUNT,
            Theme::Dark,
            StdRng::seed_from_u64(0),
        );
        assert!(field.is_none());
    }

    #[test]
    fn test_initial_particles_are_in_range() {
        let field = field(DEFAULT_COUNT, 1);
        let palette = Palette::for_theme(Theme::Dark);
        assert_eq!(field.particles().len(), DEFAULT_COUNT);
        for p in field.particles() {
            assert!((0.0..=800.0).contains(&p.x) && (0.0..=600.0).contains(&p.y));
            assert!(p.vx.abs() <= MAX_SPEED && p.vy.abs() <= MAX_SPEED);
            assert!((MIN_RADIUS..MIN_RADIUS + RADIUS_SPREAD).contains(&p.radius));
            assert!(palette.is_accent(p.color));
        }
    }

    #[test]
    fn test_oversized_count_is_capped() {
        let mut capped = ParticleField::attach(
            Some(RecordingSurface::new(80.0, 60.0)),
            usize::MAX,
            Theme::Dark,
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(capped.particles().len(), MAX_PARTICLES);

        capped.on_theme_change(Theme::Light);
        assert_eq!(capped.particles().len(), MAX_PARTICLES);
    }

    #[test]
    fn test_connection_alpha() {
        assert_eq!(connection_alpha(0.0), Some(0.3));
        assert_eq!(connection_alpha(75.0), Some(0.15));
        assert_eq!(connection_alpha(150.0), None);
        assert_eq!(connection_alpha(400.0), None);
    }

    #[test]
    fn test_reflects_off_edges() {
        let mut p = Particle {
            vx: -2.0,
            vy: 3.0,
            ..still(1.0, 599.0)
        };
        p.advance(800.0, 600.0);
        assert_eq!((p.x, p.y), (0.0, 600.0));
        assert_eq!((p.vx, p.vy), (2.0, -3.0));
    }

    #[test]
    fn test_pointer_pulls_only_when_near() {
        let mut near = still(100.0, 100.0);
        near.pull_toward((150.0, 100.0));
        assert!((near.vx - 50.0 * POINTER_PULL).abs() < 1e-9);
        assert_eq!(near.vy, 0.0);

        let mut far = still(100.0, 100.0);
        far.pull_toward((300.0, 100.0));
        assert_eq!(far.vx, 0.0);
    }

    #[test]
    fn test_pointer_nudge_accumulates() {
        let mut field = field(0, 2);
        field.particles.push(still(400.0, 300.0));
        field.set_pointer(Some((450.0, 300.0)));

        field.render_frame();
        let first = field.particles()[0].vx;
        field.render_frame();
        assert!(first > 0.0);
        assert!(field.particles()[0].vx > first);
    }

    #[test]
    fn test_no_pointer_no_force() {
        let mut field = field(0, 3);
        field.particles.push(still(400.0, 300.0));
        field.render_frame();
        assert_eq!(field.particles()[0].vx, 0.0);
        assert_eq!(field.pointer(), None);
    }

    #[test]
    fn test_coincident_pair_draws_brightest_line() {
        let mut field = field(0, 4);
        field.particles.extend([still(10.0, 10.0), still(10.0, 10.0), still(500.0, 500.0)]);
        field.render_frame();

        let lines: Vec<&DrawOp> = field.surface().lines().collect();
        assert_eq!(lines.len(), 1);
        let DrawOp::Line { color, width, .. } = lines[0] else {
            unreachable!()
        };
        assert_eq!(color.a, 0.3);
        assert_eq!(*width, LINE_WIDTH);
        assert_eq!(field.surface().circles().count(), 3);
    }

    #[test]
    fn test_frame_clears_first() {
        let mut field = field(5, 5);
        field.render_frame();
        assert_eq!(field.surface().ops[0], DrawOp::Clear);
    }

    #[test]
    fn test_theme_change_regenerates_with_same_count() {
        let mut field = field(DEFAULT_COUNT, 6);
        let before = field.particles().to_vec();

        field.on_theme_change(Theme::Light);
        let palette = Palette::for_theme(Theme::Light);
        assert_eq!(field.theme(), Theme::Light);
        assert_eq!(field.particles().len(), DEFAULT_COUNT);
        assert_ne!(field.particles(), &before[..]);
        assert!(field.particles().iter().all(|p| palette.is_accent(p.color)));
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut field = field(10, 7);
        let before = field.particles().to_vec();
        field.on_resize(1024.0, 768.0);
        assert_eq!(field.surface().width(), 1024.0);
        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn test_teardown_cancels_pending_frame() {
        let mut field = field(3, 8);
        field.start();
        assert!(field.tick());
        assert!(field.stop());
        assert!(!field.stop());
        assert!(!field.tick());
    }

    proptest! {
        #[test]
        fn prop_particles_stay_in_bounds(
            seed in any::<u64>(),
            frames in 1usize..200,
            pointer in proptest::option::of((0.0f32..800.0, 0.0f32..600.0)),
        ) {
            let mut field = field(20, seed);
            field.set_pointer(pointer);
            for _ in 0..frames {
                field.render_frame();
                for p in field.particles() {
                    prop_assert!((0.0..=800.0).contains(&p.x));
                    prop_assert!((0.0..=600.0).contains(&p.y));
                }
            }
        }

        #[test]
        fn prop_theme_change_preserves_count(seed in any::<u64>(), count in 0usize..150) {
            let mut field = field(count, seed);
            field.on_theme_change(Theme::Light);
            prop_assert_eq!(field.particles().len(), count);
            field.on_theme_change(Theme::Dark);
            prop_assert_eq!(field.particles().len(), count);
        }
    }
}
