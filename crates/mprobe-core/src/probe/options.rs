//! Per-call probe options.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::MprobeConfig;
use crate::retry::RetryPolicy;
use crate::transport::RedirectPolicy;

/// Options for a single probe. `Default` gives 3 attempt cycles, a 10 s
/// per-request timeout, followed redirects and no quirk correction.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Number of full range/head/get cycles before giving up.
    pub max_retries: u32,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Extra request headers sent with every request, in order.
    pub headers: Vec<(String, String)>,
    pub follow_redirects: bool,
    /// Run the platform quirk corrector on server content types.
    pub allow_platform_quirks: bool,
    /// Backoff is `min(backoff_base * attempt, backoff_max)`.
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    /// Aborts the whole probe, including any backoff sleep, when cancelled.
    pub cancel: Option<CancellationToken>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_attempts,
            timeout: Duration::from_millis(10_000),
            headers: Vec::new(),
            follow_redirects: true,
            allow_platform_quirks: false,
            backoff_base: policy.base_delay,
            backoff_max: policy.max_delay,
            cancel: None,
        }
    }
}

impl ProbeOptions {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn with_platform_quirks(mut self, allow: bool) -> Self {
        self.allow_platform_quirks = allow;
        self
    }

    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_max = max;
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            base_delay: self.backoff_base,
            max_delay: self.backoff_max,
        }
    }

    pub fn redirect_policy(&self) -> RedirectPolicy {
        if self.follow_redirects {
            RedirectPolicy::Follow
        } else {
            RedirectPolicy::Manual
        }
    }
}

impl From<&MprobeConfig> for ProbeOptions {
    fn from(cfg: &MprobeConfig) -> Self {
        let defaults = ProbeOptions::default();
        let (backoff_base, backoff_max) = match &cfg.backoff {
            Some(b) => (
                Duration::from_millis(b.base_ms),
                Duration::from_millis(b.max_ms),
            ),
            None => (defaults.backoff_base, defaults.backoff_max),
        };
        Self {
            max_retries: cfg.max_retries,
            timeout: Duration::from_millis(cfg.timeout_ms),
            headers: cfg
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            follow_redirects: cfg.follow_redirects,
            allow_platform_quirks: cfg.allow_platform_quirks,
            backoff_base,
            backoff_max,
            cancel: None,
        }
    }
}
