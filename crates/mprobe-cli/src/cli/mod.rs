//! CLI for the mprobe media prober.

mod commands;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mprobe_core::config;

use commands::{run_batch, run_classify, run_completions, run_probe};

/// Top-level CLI for mprobe.
#[derive(Debug, Parser)]
#[command(name = "mprobe")]
#[command(about = "Probe remote media URLs for content type, size and Range support", long_about = None)]
pub struct Cli {
    /// Log debug output to stderr instead of the log file.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Probe a single URL.
    Probe {
        /// Direct HTTP/HTTPS URL of the media resource.
        url: String,

        #[command(flatten)]
        args: ProbeArgs,
    },

    /// Probe every URL listed in a file (one per line, `#` comments allowed).
    Batch {
        /// Path to the URL list.
        path: String,

        /// Probes in flight at once (default from config).
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,

        #[command(flatten)]
        args: ProbeArgs,
    },

    /// Classify a URL offline: media kind and quirk-corrected content type.
    Classify {
        /// URL to classify (no request is made).
        url: String,

        /// Content type the server reported, if known.
        #[arg(long, value_name = "TYPE")]
        content_type: Option<String>,

        /// Apply CDN content-type quirk correction.
        #[arg(long)]
        quirks: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

/// Options shared by `probe` and `batch`; unset values fall back to config.toml.
#[derive(Debug, Clone, Default, Args)]
pub struct ProbeArgs {
    /// Extra request header, "Name: value" (repeatable).
    #[arg(short = 'H', long = "header", value_name = "HEADER", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Attempt cycles before giving up.
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Per-request timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Do not follow redirects.
    #[arg(long)]
    pub no_follow: bool,

    /// Apply CDN content-type quirk correction.
    #[arg(long)]
    pub quirks: bool,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Parses `Name: value` into a header pair.
fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(format!("invalid header name in {s:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            CliCommand::Probe { url, args } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_probe(&cfg, &url, &args).await?;
            }
            CliCommand::Batch {
                path,
                concurrency,
                args,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let concurrency = concurrency.unwrap_or(cfg.batch_concurrency);
                run_batch(&cfg, std::path::Path::new(&path), concurrency, &args).await?;
            }
            CliCommand::Classify {
                url,
                content_type,
                quirks,
                json,
            } => run_classify(&url, content_type.as_deref(), quirks, json)?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
