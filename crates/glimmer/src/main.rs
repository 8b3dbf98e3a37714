mod app;
mod logging;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use glimmer_config::{FileStore, MemoryStore, PreferenceStore, Settings, load_theme, save_theme};
use glimmer_core::{MAX_PARTICLES, Theme};
use glimmer_effects::BackdropOptions;
use ratatui::DefaultTerminal;

use crate::app::App;

/// Falling glyph rain and an interactive particle field for your terminal.
#[derive(Parser, Debug)]
#[command(name = "glimmer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Start with this theme (dark or light) and remember it
    #[arg(long, value_name = "THEME")]
    theme: Option<Theme>,

    /// Refresh rate in frames per second
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: Option<u32>,

    /// Disable the glyph rain
    #[arg(long)]
    no_rain: bool,

    /// Disable the particle field
    #[arg(long)]
    no_particles: bool,

    /// Number of particles
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(0..=MAX_PARTICLES as u64)
    )]
    particles: Option<u64>,

    /// Seed for reproducible effects
    #[arg(long)]
    seed: Option<u64>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file (defaults to the user data directory)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Fold command line overrides into the loaded settings.
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(fps) = self.fps {
            settings.fps = fps;
        }
        if self.no_rain {
            settings.rain.enabled = false;
        }
        if self.no_particles {
            settings.particles.enabled = false;
        }
        if let Some(count) = self.particles {
            settings.particles.count = usize::try_from(count).unwrap_or(MAX_PARTICLES);
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        settings
    }
}

fn backdrop_options(settings: &Settings) -> BackdropOptions {
    BackdropOptions {
        rain: settings.rain.enabled,
        particles: settings.particles.enabled,
        particle_count: settings.particles.count,
        cell_width: settings.canvas.cell_width,
        cell_height: settings.canvas.cell_height,
        seed: settings.seed,
    }
}

fn open_store() -> Box<dyn PreferenceStore> {
    match FileStore::open_default() {
        Ok(store) => {
            tracing::debug!(path = %store.path().display(), "preferences opened");
            Box::new(store)
        }
        Err(err) => {
            tracing::warn!(%err, "preferences unavailable, theme will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Some(path) = logging::init(args.verbose, args.log_file.clone())? {
        tracing::info!(path = %path.display(), "starting glimmer v{}", env!("CARGO_PKG_VERSION"));
    }

    let settings = args.apply(Settings::load(args.config.as_deref())?);
    let mut store = open_store();
    let theme = match args.theme {
        Some(theme) => {
            save_theme(store.as_mut(), theme);
            theme
        }
        None => load_theme(store.as_ref()).unwrap_or_default(),
    };
    tracing::info!(%theme, fps = settings.fps, "settings resolved");

    let terminal = ratatui::init();
    let result = run(terminal, theme, &settings, store);
    // Restore before reporting any error so the report is readable.
    release_mouse(&mut std::io::stdout());
    ratatui::restore();
    result
}

/// Turn mouse capture off. Failure is only logged.
fn release_mouse(out: &mut impl Write) -> bool {
    match crossterm::execute!(out, DisableMouseCapture) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%err, "failed to disable mouse capture");
            false
        }
    }
}

fn run(
    mut terminal: DefaultTerminal,
    theme: Theme,
    settings: &Settings,
    store: Box<dyn PreferenceStore>,
) -> color_eyre::Result<()> {
    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
    let size = terminal.size()?;
    let app = App::new(
        size.width,
        size.height,
        theme,
        &backdrop_options(settings),
        settings.frame_interval_ms(),
        store,
    );
    app.run(terminal)
}
