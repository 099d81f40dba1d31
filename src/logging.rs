//! Tracing subscriber setup
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `info`). With debug
//! logging on, everything at `debug` and above is also appended to
//! `debug.log` in the cache directory, which each run truncates.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Mirror logs into this file when set
    pub debug_log: Option<PathBuf>,
}

fn base_filter() -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    ["chromiumoxide::handler=off", "chromiumoxide::conn=off", "html5ever=warn", "selectors=warn"]
        .into_iter()
        .filter_map(|d| d.parse().ok())
        .fold(filter, EnvFilter::add_directive)
}

/// Install the global subscriber; later calls are no-ops
///
/// Also routes `log` records through tracing.
pub fn init(options: &LoggingOptions) {
    let file_layer = options.debug_log.as_deref().and_then(|path| match open_debug_log(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .with_filter(LevelFilter::DEBUG),
        ),
        Err(e) => {
            eprintln!("debug log disabled, cannot open {}: {e}", path.display());
            None
        }
    });

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(base_filter());

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

fn open_debug_log(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Empty the debug log at the start of a run
///
/// An open append-mode handle keeps working; writes restart at offset zero.
pub fn clear_debug_log(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        tracing::debug!("Cannot create log directory {}: {e}", parent.display());
        return;
    }
    if let Err(e) = std::fs::write(path, b"") {
        tracing::debug!("Cannot clear debug log {}: {e}", path.display());
    }
}
