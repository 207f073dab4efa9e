//! `mprobe batch <file>` – probe every URL in a list.

use anyhow::{Context, Result};
use mprobe_core::config::MprobeConfig;
use mprobe_core::{probe_many, Prober};
use std::path::Path;
use std::sync::Arc;

use super::{ctrl_c_token, probe_options};
use crate::cli::output;
use crate::cli::ProbeArgs;

/// Probe each listed URL; fails (after printing everything) if any probe failed.
pub async fn run_batch(
    cfg: &MprobeConfig,
    path: &Path,
    concurrency: usize,
    args: &ProbeArgs,
) -> Result<()> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read URL list {}", path.display()))?;
    let urls = parse_url_list(&data);
    if urls.is_empty() {
        anyhow::bail!("no URLs in {}", path.display());
    }

    let options = probe_options(cfg, args).with_cancel(ctrl_c_token());
    tracing::info!(count = urls.len(), concurrency, "starting batch probe");
    let results = probe_many(Arc::new(Prober::new()), urls.clone(), &options, concurrency).await;

    let mut failed = 0usize;
    for (url, result) in urls.iter().zip(&results) {
        if result.is_err() {
            failed += 1;
        }
        if args.json {
            println!("{}", output::json_line(url, result));
        } else {
            println!("{}", output::table_row(url, result));
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} probes failed", failed, results.len());
    }
    Ok(())
}

/// One URL per line; blank lines and `#` comments are skipped.
pub(crate) fn parse_url_list(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
