//! Tracing subscriber setup shared by both binaries.

use std::io::IsTerminal;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::sanitize::RedactingMakeWriter;
use crate::config::{LogConfig, LogMode};
use crate::GlucosenseError;

/// Resolve `Auto` against whether stdout is a terminal.
///
/// Writing logs to the terminal would corrupt the TUI (alternate screen), so
/// an interactive session logs to the file and anything else to stdout.
#[must_use]
pub fn effective_mode(mode: LogMode, interactive: bool) -> LogMode {
    match mode {
        LogMode::Auto if interactive => LogMode::File,
        LogMode::Auto => LogMode::Stdout,
        other => other,
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the background writer on drop and must be held
/// until the process exits.
///
/// # Errors
/// Returns an IO error if the log file cannot be opened.
pub fn init(config: &LogConfig) -> Result<WorkerGuard, GlucosenseError> {
    let mode = effective_mode(config.mode, std::io::stdout().is_terminal());

    let (writer, guard) = match mode {
        LogMode::File | LogMode::Auto => {
            tracing_appender::non_blocking(open_log_file(&config.file)?)
        }
        LogMode::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogMode::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(RedactingMakeWriter::new(writer)),
        )
        .init();

    Ok(guard)
}

fn open_log_file(path: &Path) -> Result<std::fs::File, GlucosenseError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            // Best-effort: opening the file reports the real error.
            let _ = std::fs::create_dir_all(parent);
        }
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(file)
}
