use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for a `-v` count.
fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Send tracing output to a log file, since the terminal belongs to the UI.
///
/// `RUST_LOG` overrides the level picked by `verbosity`. Returns the log path,
/// or `None` when no data directory exists and no path was given.
pub fn init(verbosity: u8, path: Option<PathBuf>) -> color_eyre::Result<Option<PathBuf>> {
    let path = match path {
        Some(path) => path,
        None => match glimmer_config::data_dir() {
            Ok(dir) => dir.join("glimmer.log"),
            Err(_) => return Ok(None),
        },
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level(verbosity)));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .init();

    Ok(Some(path))
}
