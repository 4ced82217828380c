use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is not set.
///
/// The report itself goes to stdout, so the console log stays quiet unless
/// something goes wrong or debug mode is on.
pub fn default_filter(debug_mode: bool) -> &'static str {
    if debug_mode { "debug" } else { "warn" }
}

/// Setup logging on stderr, plus a daily rotating file when `log_dir` is given.
///
/// # Arguments
/// * `debug_mode` - If true, use debug level; otherwise warnings and errors only
/// * `log_dir` - Optional directory for `modcheck.<date>` log files
///
/// # Returns
/// A guard that must be held for the duration of the program to keep file logging
/// active, if file logging was requested
pub fn setup_logging(debug_mode: bool, log_dir: Option<&Utf8Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug_mode)));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            ensure_log_dir(dir)?;
            let file_appender = rolling::daily(dir, "modcheck");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false) // No ANSI codes in log files
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        "Logging initialized: debug={}, log_dir={:?}",
        debug_mode,
        log_dir
    );

    Ok(guard)
}

fn ensure_log_dir(dir: &Utf8Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir))?;
    }
    Ok(())
}
