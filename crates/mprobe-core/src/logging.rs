//! Logging init: file under XDG state dir, or graceful fallback to stderr.
//!
//! `RUST_LOG` always wins over the built-in filters below.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter for the log file: probe steps and retries at debug.
const FILE_FILTER: &str = "info,mprobe=debug,mprobe_core=debug";
/// Filter for stderr: stdout carries probe results, so keep stderr quiet.
const STDERR_FILTER: &str = "warn";
const STDERR_VERBOSE_FILTER: &str = "info,mprobe=debug,mprobe_core=debug";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Path of the log file: `~/.local/state/mprobe/mprobe.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mprobe")?;
    Ok(xdg_dirs.get_state_home().join("mprobe.log"))
}

/// Plain-text subscriber appending to `file`.
fn file_subscriber(file: fs::File, filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish()
}

/// Initialize structured logging to the state-dir log file.
/// On failure (e.g. log dir unwritable), returns Err so the caller can fall back to stderr.
pub fn init_logging() -> Result<()> {
    let log_file_path = log_file_path()?;
    if let Some(dir) = log_file_path.parent() {
        fs::create_dir_all(dir)?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    file_subscriber(file, env_filter(FILE_FILTER))
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::info!("mprobe logging initialized at {}", log_file_path.display());

    Ok(())
}

/// Initialize logging to stderr only. Used when `init_logging()` fails, or when
/// the user asks for verbose output on the terminal.
pub fn init_logging_stderr(verbose: bool) {
    let filter = if verbose {
        STDERR_VERBOSE_FILTER
    } else {
        STDERR_FILTER
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
