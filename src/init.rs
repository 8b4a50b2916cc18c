// Logging setup
//
// Console output at the configured level, plus ERROR-level events mirrored
// into a local file for post-run inspection.

use stackup_config::{LogFormat, LoggingConfig};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing::Subscriber;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Error log that is created (truncating any previous run's file) on its first write,
/// so runs without errors leave nothing behind.
pub struct ErrorLogFile {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl ErrorLogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for &ErrorLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut slot = self
            .file
            .lock()
            .map_err(|_| io::Error::other("error log lock poisoned"))?;
        if slot.is_none() {
            *slot = Some(File::create(&self.path)?);
        }
        match slot.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::other("error log unavailable")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut slot = self
            .file
            .lock()
            .map_err(|_| io::Error::other("error log lock poisoned"))?;
        match slot.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Build the subscriber for this run's logging configuration
pub fn build_subscriber(config: &LoggingConfig) -> Box<dyn Subscriber + Send + Sync> {
    // Parse log level from config
    let env_filter =
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let error_log = Arc::new(ErrorLogFile::new(&config.error_log));
    let error_layer = fmt::layer()
        .with_writer(error_log)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::ERROR);

    let registry = tracing_subscriber::registry().with(error_layer);

    match config.format {
        LogFormat::Json => Box::new(registry.with(fmt::layer().json().with_filter(env_filter))),
        LogFormat::Text => Box::new(
            registry.with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_filter(env_filter),
            ),
        ),
    }
}

/// Install logging for the current thread; dropping the guard uninstalls it
pub fn init_tracing(config: &LoggingConfig) -> DefaultGuard {
    tracing::subscriber::set_default(build_subscriber(config))
}
