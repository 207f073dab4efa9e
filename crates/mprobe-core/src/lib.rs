//! Probe remote media URLs for content type, size and byte-range support
//! while transferring as little as possible.
//!
//! ```no_run
//! # async fn run() -> Result<(), mprobe_core::ProbeError> {
//! use mprobe_core::{probe, ProbeOptions};
//!
//! let result = probe("https://cdn.example.com/clip.mp4", &ProbeOptions::default()).await?;
//! println!("{:?} {:?} via {}", result.content_type, result.size, result.method);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod logging;

pub mod classify;
pub mod probe;
pub mod quirks;
pub mod retry;
pub mod transport;

pub use classify::{
    extract_size_from_content_length, extract_size_from_content_range, is_audio_content,
    is_video_content, normalize_content_type, MediaKind,
};
pub use probe::{probe, probe_many, ProbeMethod, ProbeOptions, ProbeResult, Prober};
pub use quirks::{apply_platform_quirks, quirk_reason};
pub use retry::{ProbeError, ProbeErrorKind};
pub use transport::{CurlTransport, Transport};

/// Caller-side cancellation for [`ProbeOptions::cancel`].
pub use tokio_util::sync::CancellationToken;
