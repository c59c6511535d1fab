//! Tracing setup.
//!
//! Interactive sessions own the terminal, so they log to a file under the
//! state directory. One-shot lookups log to stderr beside their output.

use crate::error::{Result, ShelfError};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "shelf_lookup=info,sqlx=warn";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Truncated on each session.
    File(PathBuf),
    Stderr,
}

impl LogSink {
    pub fn for_session(one_shot: bool) -> Self {
        if one_shot {
            Self::Stderr
        } else {
            Self::File(log_path())
        }
    }
}

/// Installs the global subscriber for `sink`.
pub fn init(sink: &LogSink) -> Result<()> {
    let filter = filter_from(std::env::var("RUST_LOG").ok().as_deref());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match sink {
        LogSink::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogSink::File(path) => {
            let file = open_log_file(path)?;
            builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };
    installed.map_err(|e| ShelfError::internal(format!("Failed to install logger: {e}")))
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ShelfError::config(format!("Cannot create log directory {}: {e}", parent.display()))
        })?;
    }
    File::create(path)
        .map_err(|e| ShelfError::config(format!("Cannot open log file {}: {e}", path.display())))
}

/// Session log location: `<state dir>/shelf-lookup/shelf.log`.
///
/// Platforms without a state directory (macOS, Windows) use the local data
/// directory instead.
pub fn log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("shelf-lookup"))
        .unwrap_or_else(std::env::temp_dir)
        .join("shelf.log")
}
