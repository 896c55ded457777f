use crate::{
    DEFAULT_RETENTION, DEFAULT_SIZE_LIMIT, LogLevel, RedactingWriter, RotatingWriter,
};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Why [`setup_logging`] could not install the subscriber.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to prepare the log file: {0}")]
    Io(#[from] io::Error),
    /// A global subscriber is already installed. Safe to ignore when the
    /// process configures logging from more than one entry point.
    #[error("a global logging subscriber is already installed")]
    AlreadyInitialized,
}

/// Settings for [`setup_logging`].
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Verbosity; applies to both outputs.
    pub level: LogLevel,
    /// Directory for the log file, created if missing.
    pub dir: PathBuf,
    /// Application name; first component of the log file name.
    pub app_name: String,
    /// Optional script name appended to the file name.
    pub script_name: Option<String>,
}

impl LogConfig {
    /// `app_name_script_name.log` when a script name is set, otherwise
    /// `app_name.log`.
    pub fn file_name(&self) -> String {
        match &self.script_name {
            Some(script) => format!("{}_{script}.log", self.app_name),
            None => format!("{}.log", self.app_name),
        }
    }
}

/// Installs the process-wide `tracing` subscriber: events go to stderr
/// and to a rotating file under `config.dir`, with secret values masked
/// on both outputs (see [`redact_secrets`](crate::redact_secrets)).
///
/// The file rotates at 10 MB or at the first write past UTC midnight,
/// and rotated files are kept for 30 days.
///
/// # Errors
///
/// Returns [`SetupError::Io`] when the log directory or file cannot be
/// prepared, and [`SetupError::AlreadyInitialized`] when a global
/// subscriber is already installed (repeated setup is not fatal; the
/// existing subscriber stays in place).
pub fn setup_logging(config: &LogConfig) -> Result<(), SetupError> {
    std::fs::create_dir_all(&config.dir)?;
    let path = config.dir.join(config.file_name());
    let file = RotatingWriter::new(path, DEFAULT_SIZE_LIMIT, DEFAULT_RETENTION)?;

    let stderr_layer = fmt::layer()
        .with_ansi(true)
        .with_writer(|| RedactingWriter::new(io::stderr()));
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(move || RedactingWriter::new(file.clone()));

    tracing_subscriber::registry()
        .with(LevelFilter::from(config.level))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| SetupError::AlreadyInitialized)
}
