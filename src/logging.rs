use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use env_logger::{Builder, Env, Target};
use crate::settings::LoggingSettings;
use crate::utils;
use crate::Result;

pub const LOG_FILE_NAME: &str = "launcher.log";

pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Installs the global logger. `RUST_LOG` overrides the configured level.
/// Output goes to a file when enabled, since stderr is owned by the terminal
/// UI; otherwise logging is discarded.
pub fn init(settings: &LoggingSettings, data_dir: &Path) -> Result<Option<PathBuf>> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(settings.level.as_str()));
    builder.format_timestamp_secs();

    let log_path = if settings.file {
        let dir = log_dir(data_dir);
        utils::ensure_dir_exists(&dir)?;
        let path = dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        builder.target(Target::Pipe(Box::new(file)));
        Some(path)
    } else {
        builder.filter_level(log::LevelFilter::Off);
        None
    };

    if builder.try_init().is_err() {
        log::warn!("Logger already initialized");
    }

    Ok(log_path)
}
