//! CLI command handlers. Each command is in its own file.

mod batch;
mod classify;
mod completions;
mod probe;

pub use batch::run_batch;
pub use classify::run_classify;
pub use completions::run_completions;
pub use probe::run_probe;

use mprobe_core::config::MprobeConfig;
use mprobe_core::{CancellationToken, ProbeOptions};

use super::ProbeArgs;

/// Config values overridden by whatever the user passed on the command line.
/// Command-line headers are appended after the configured ones.
pub(crate) fn probe_options(cfg: &MprobeConfig, args: &ProbeArgs) -> ProbeOptions {
    let mut options = ProbeOptions::from(cfg);
    if let Some(n) = args.max_retries {
        options.max_retries = n;
    }
    if let Some(ms) = args.timeout_ms {
        options.timeout = std::time::Duration::from_millis(ms);
    }
    if args.no_follow {
        options.follow_redirects = false;
    }
    if args.quirks {
        options.allow_platform_quirks = true;
    }
    options.headers.extend(args.headers.iter().cloned());
    options
}

/// Token cancelled on Ctrl-C so an in-flight probe (and its backoff) stops promptly.
pub(crate) fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling probes");
            child.cancel();
        }
    });
    token
}
