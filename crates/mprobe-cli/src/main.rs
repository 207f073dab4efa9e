use clap::Parser;
use mprobe_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Verbose runs log to the terminal; otherwise to the state-dir log file.
    if cli.verbose {
        logging::init_logging_stderr(true);
    } else if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr(false);
        tracing::warn!("file logging unavailable, using stderr: {:#}", e);
    }

    if let Err(err) = cli.run().await {
        eprintln!("mprobe error: {:#}", err);
        std::process::exit(1);
    }
}
