//! Backdrop state: both renderers driven together.

use glimmer_core::{Renderer, Theme};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
};

use crate::animations::{
    particles::{DEFAULT_COUNT, ParticleField},
    rain::RainField,
};
use crate::canvas::Canvas;
use crate::color::{Palette, to_color};

/// Which effects to run and how to map them onto the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropOptions {
    pub rain: bool,
    pub particles: bool,
    pub particle_count: usize,
    /// Logical pixels per terminal column.
    pub cell_width: f32,
    /// Logical pixels per terminal row.
    pub cell_height: f32,
    /// Seed for both renderers; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for BackdropOptions {
    fn default() -> Self {
        Self {
            rain: true,
            particles: true,
            particle_count: DEFAULT_COUNT,
            cell_width: 7.0,
            cell_height: 14.0,
            seed: None,
        }
    }
}

/// The rain layer below the particle layer, each on its own canvas.
#[derive(Debug)]
pub struct Backdrop {
    rain: Option<RainField<Canvas>>,
    particles: Option<ParticleField<Canvas>>,
    theme: Theme,
    cell_width: f32,
    cell_height: f32,
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
}

impl Backdrop {
    /// Build the enabled renderers for a `cols x rows` terminal.
    ///
    /// Both loops start disarmed.
    pub fn new(cols: u16, rows: u16, theme: Theme, options: &BackdropOptions) -> Self {
        let (rain_rng, particle_rng) = match options.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_os_rng(), StdRng::from_os_rng()),
        };
        let canvas = || Canvas::for_cells(cols, rows, options.cell_width, options.cell_height);

        let rain = RainField::attach(options.rain.then(canvas), theme, rain_rng);
        let particles = ParticleField::attach(
            options.particles.then(canvas),
            options.particle_count,
            theme,
            particle_rng,
        );

        let mut backdrop = Self {
            rain,
            particles,
            theme,
            cell_width: options.cell_width,
            cell_height: options.cell_height,
            last_width: cols,
            last_height: rows,
        };
        backdrop.set_canvas_backdrop();
        backdrop
    }

    pub fn rain(&self) -> Option<&RainField<Canvas>> {
        self.rain.as_ref()
    }

    pub fn particles(&self) -> Option<&ParticleField<Canvas>> {
        self.particles.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Arm both loops.
    pub fn start(&mut self) {
        self.for_each(|r| r.start());
    }

    /// Cancel both loops. Returns `true` if any pending frame was cancelled.
    pub fn stop(&mut self) -> bool {
        let mut cancelled = false;
        self.for_each(|r| cancelled |= r.stop());
        cancelled
    }

    /// Whether any renderer has a frame scheduled.
    pub fn is_running(&self) -> bool {
        self.rain.as_ref().is_some_and(|r| r.is_running())
            || self.particles.as_ref().is_some_and(|p| p.is_running())
    }

    /// Pause when running, resume when paused. Returns the new running state.
    pub fn toggle_running(&mut self) -> bool {
        if self.is_running() {
            self.stop();
            false
        } else {
            self.start();
            true
        }
    }

    /// Advance every armed renderer by one frame.
    pub fn tick(&mut self) -> bool {
        let mut drawn = false;
        self.for_each(|r| drawn |= r.tick());
        drawn
    }

    /// Follow a terminal resize. Unchanged dimensions are ignored.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols == self.last_width && rows == self.last_height {
            return;
        }
        self.last_width = cols;
        self.last_height = rows;
        let width = f32::from(cols) * self.cell_width;
        let height = f32::from(rows) * self.cell_height;
        tracing::debug!(cols, rows, "backdrop resized");
        self.for_each(|r| r.on_resize(width, height));
    }

    /// Point the particles at a terminal cell, or release them with `None`.
    pub fn set_pointer_cell(&mut self, cell: Option<(u16, u16)>) {
        let pointer = cell.map(|(col, row)| {
            (
                (f32::from(col) + 0.5) * self.cell_width,
                (f32::from(row) + 0.5) * self.cell_height,
            )
        });
        if let Some(particles) = self.particles.as_mut() {
            particles.set_pointer(pointer);
        }
    }

    /// Hand a new theme to both renderers.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.for_each(|r| r.on_theme_change(theme));
        self.set_canvas_backdrop();
    }

    /// Render the backdrop to the frame.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(self, area);
    }

    fn set_canvas_backdrop(&mut self) {
        let background = Palette::for_theme(self.theme).background;
        if let Some(rain) = self.rain.as_mut() {
            rain.surface_mut().set_backdrop(background);
        }
        if let Some(particles) = self.particles.as_mut() {
            particles.surface_mut().set_backdrop(background);
        }
    }

    fn for_each(&mut self, mut f: impl FnMut(&mut dyn Renderer)) {
        if let Some(rain) = self.rain.as_mut() {
            f(rain);
        }
        if let Some(particles) = self.particles.as_mut() {
            f(particles);
        }
    }
}

impl Widget for &Backdrop {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let background = to_color(Palette::for_theme(self.theme).background);
        Block::new()
            .style(Style::new().bg(background))
            .render(area, buf);
        if let Some(rain) = &self.rain {
            rain.surface().render(area, buf);
        }
        if let Some(particles) = &self.particles {
            particles.surface().render(area, buf);
        }
    }
}
