//! `mprobe probe <url>` – probe a single URL.

use anyhow::Result;
use mprobe_core::config::MprobeConfig;
use mprobe_core::Prober;

use super::{ctrl_c_token, probe_options};
use crate::cli::output;
use crate::cli::ProbeArgs;

pub async fn run_probe(cfg: &MprobeConfig, url: &str, args: &ProbeArgs) -> Result<()> {
    let options = probe_options(cfg, args).with_cancel(ctrl_c_token());
    let result = Prober::new().probe(url, &options).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", output::describe(url, &result));
    }
    Ok(())
}
