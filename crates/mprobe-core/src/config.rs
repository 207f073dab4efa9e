use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Backoff parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Delay multiplied by the attempt number, in milliseconds.
    pub base_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_ms: 1000,
            max_ms: 5000,
        }
    }
}

/// Global configuration loaded from `~/.config/mprobe/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MprobeConfig {
    /// Attempt cycles (range, head, get) per probe.
    pub max_retries: u32,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Follow redirects in the transport; otherwise 3xx responses are returned as-is.
    pub follow_redirects: bool,
    /// Correct content types for CDNs known to misreport them.
    pub allow_platform_quirks: bool,
    /// Probes in flight at once for `mprobe batch`.
    pub batch_concurrency: usize,
    /// Optional backoff policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub backoff: Option<BackoffConfig>,
    /// Extra request headers sent with every probe request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for MprobeConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout_ms: 10_000,
            follow_redirects: true,
            allow_platform_quirks: false,
            batch_concurrency: 8,
            backoff: None,
            headers: BTreeMap::new(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mprobe")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MprobeConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but at an explicit path.
pub fn load_or_init_at(path: &std::path::Path) -> Result<MprobeConfig> {
    if !path.exists() {
        let default_cfg = MprobeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: MprobeConfig = toml::from_str(&data)?;
    Ok(cfg)
}
