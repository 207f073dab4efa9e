//! Content-type correction for CDNs known to misreport media types.
//!
//! Some CDNs serve every object as `video/mp4` (or omit the type) while the
//! URL itself declares the real type in a query parameter. The corrector reads
//! that parameter and decides whether to trust it over the server.

mod params;

use url::Url;

use crate::classify::normalize_content_type;

pub use params::{declared_mime_type, map_short_code, MIME_QUERY_PARAMS};

/// CDN platforms with known content-type quirks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Declared type only overrides the server when the top-level types conflict.
    TikTok,
    /// Declared type always overrides the server.
    Douyin,
}

const TIKTOK_HOST_TOKENS: &[&str] = &["tiktokcdn", "tiktokv"];
const DOUYIN_HOST_TOKENS: &[&str] = &["douyinvod", "douyincdn"];

impl Platform {
    /// Detects the platform from a URL host (substring match, case-insensitive).
    pub fn from_host(host: &str) -> Option<Self> {
        let host = host.to_ascii_lowercase();
        if TIKTOK_HOST_TOKENS.iter().any(|t| host.contains(t)) {
            Some(Platform::TikTok)
        } else if DOUYIN_HOST_TOKENS.iter().any(|t| host.contains(t)) {
            Some(Platform::Douyin)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::TikTok => "TikTok CDN",
            Platform::Douyin => "Douyin CDN",
        }
    }
}

/// Returns the corrected content type for `url`, or `server_content_type`
/// unchanged when no quirk applies or the URL does not parse.
pub fn apply_platform_quirks(url: &str, server_content_type: Option<&str>) -> Option<String> {
    let unchanged = || server_content_type.map(str::to_string);
    let Ok(parsed) = Url::parse(url) else {
        return unchanged();
    };
    let Some(platform) = parsed.host_str().and_then(Platform::from_host) else {
        return unchanged();
    };
    let Some(declared) = declared_mime_type(&parsed) else {
        return unchanged();
    };

    match platform {
        Platform::TikTok => {
            if top_level(Some(declared.as_str())) != top_level(server_content_type) {
                Some(declared)
            } else {
                unchanged()
            }
        }
        Platform::Douyin => Some(declared),
    }
}

/// Human-readable description of a correction, or `None` when nothing changed.
pub fn quirk_reason(url: &str, original: Option<&str>, corrected: Option<&str>) -> Option<String> {
    let corrected = corrected?;
    if original == Some(corrected) {
        return None;
    }
    let parsed = Url::parse(url).ok()?;
    let platform = parsed.host_str().and_then(Platform::from_host)?;
    Some(format!(
        "{} quirk: server reported {}, URL declares {}",
        platform.name(),
        original.unwrap_or("no content type"),
        corrected
    ))
}

fn top_level(content_type: Option<&str>) -> Option<String> {
    let ct = normalize_content_type(content_type?)?;
    ct.split('/').next().map(str::to_string)
}
