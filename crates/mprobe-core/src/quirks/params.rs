//! Declared MIME types carried in CDN query parameters.

use url::Url;

use crate::classify::normalize_content_type;

/// Query parameter names checked in priority order.
pub const MIME_QUERY_PARAMS: &[&str] = &["mime_type", "mimeType", "content_type", "type"];

/// Maps a CDN short code (`audio_mpeg`) to a canonical MIME type.
pub fn map_short_code(code: &str) -> Option<&'static str> {
    let mime = match code.trim().to_ascii_lowercase().as_str() {
        "video_mp4" => "video/mp4",
        "video_webm" => "video/webm",
        "audio_mpeg" | "audio_mp3" => "audio/mpeg",
        "audio_mp4" | "audio_m4a" => "audio/mp4",
        "audio_aac" => "audio/aac",
        "audio_ogg" => "audio/ogg",
        "audio_wav" => "audio/wav",
        "audio_webm" => "audio/webm",
        _ => return None,
    };
    Some(mime)
}

/// First recognized MIME type declared in the URL's query.
///
/// Parameters are consulted in [`MIME_QUERY_PARAMS`] order; a value containing
/// `/` is taken verbatim (normalized), anything else must be a known short code.
pub fn declared_mime_type(url: &Url) -> Option<String> {
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    MIME_QUERY_PARAMS.iter().find_map(|name| {
        let (_, value) = pairs.iter().find(|(k, _)| k == name)?;
        if value.contains('/') {
            normalize_content_type(value)
        } else {
            map_short_code(value).map(str::to_string)
        }
    })
}
