//! Content classification: video/audio detection and header value parsing.
//!
//! Everything here is pure. Malformed input yields `None`/`false`, never an error.

mod headers;

pub use headers::{
    extract_size_from_content_length, extract_size_from_content_range, normalize_content_type,
};

/// Known video MIME types that do not share the `video/` prefix (streaming manifests).
const VIDEO_MIMES: &[&str] = &[
    "video/mp4",
    "video/webm",
    "video/ogg",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-matroska",
    "video/x-flv",
    "video/mpeg",
    "video/mp2t",
    "video/3gpp",
    "application/x-mpegurl",
    "application/vnd.apple.mpegurl",
    "application/dash+xml",
];

const AUDIO_MIMES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/mp4",
    "audio/x-m4a",
    "audio/aac",
    "audio/ogg",
    "audio/opus",
    "audio/wav",
    "audio/x-wav",
    "audio/webm",
    "audio/flac",
    "audio/x-flac",
    "application/ogg",
];

// Extension sets are disjoint so a bare URL never classifies as both.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "webm", "mkv", "mov", "avi", "flv", "wmv", "mpg", "mpeg", "ts", "m2ts", "3gp",
    "ogv", "m3u8", "mpd",
];

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "m4a", "aac", "ogg", "oga", "opus", "wav", "flac", "wma", "aiff", "weba",
];

/// Coarse media kind derived from the two classification flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Other,
}

/// True if `content_type` names a known video type (or any `video/*`), or the
/// URL path ends in a video extension. The query string is ignored.
pub fn is_video_content(content_type: Option<&str>, url: &str) -> bool {
    mime_matches(content_type, "video/", VIDEO_MIMES)
        || extension_of(url).is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

/// Audio counterpart of [`is_video_content`].
pub fn is_audio_content(content_type: Option<&str>, url: &str) -> bool {
    mime_matches(content_type, "audio/", AUDIO_MIMES)
        || extension_of(url).is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

/// Video wins when both flags are set (conflicting content type and extension).
pub fn media_kind(is_video: bool, is_audio: bool) -> MediaKind {
    match (is_video, is_audio) {
        (true, _) => MediaKind::Video,
        (false, true) => MediaKind::Audio,
        (false, false) => MediaKind::Other,
    }
}

fn mime_matches(content_type: Option<&str>, prefix: &str, known: &[&str]) -> bool {
    let Some(ct) = content_type.and_then(normalize_content_type) else {
        return false;
    };
    ct.starts_with(prefix) || known.contains(&ct.as_str())
}

/// Lowercased extension of the last path segment, query and fragment stripped.
///
/// Falls back to plain string splitting when `url` is not absolute, so bare
/// paths such as `/media/clip.mp4?x=1` still classify.
fn extension_of(url: &str) -> Option<String> {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let segment = path.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_by_mime() {
        assert!(is_video_content(Some("video/mp4"), "https://example.com/x"));
        assert!(is_video_content(Some("Video/MP4; codecs=\"avc1\""), "https://example.com/x"));
        assert!(is_video_content(Some("video/x-something-new"), "https://example.com/x"));
        assert!(is_video_content(
            Some("application/vnd.apple.mpegurl"),
            "https://example.com/x"
        ));
        assert!(!is_video_content(Some("audio/mpeg"), "https://example.com/x"));
    }

    #[test]
    fn audio_by_mime() {
        assert!(is_audio_content(Some("audio/mpeg"), "https://example.com/x"));
        assert!(is_audio_content(Some("audio/x-anything"), "https://example.com/x"));
        assert!(is_audio_content(Some("application/ogg"), "https://example.com/x"));
        assert!(!is_audio_content(Some("video/mp4"), "https://example.com/x"));
    }

    #[test]
    fn extension_ignores_query_string() {
        assert!(is_video_content(None, "https://cdn.example.com/a/clip.MP4?token=abc.mp3"));
        assert!(is_audio_content(None, "https://cdn.example.com/song.mp3?sig=1#t=10"));
        assert!(!is_audio_content(None, "https://cdn.example.com/clip.mp4?name=song.mp3"));
    }

    #[test]
    fn extension_on_relative_path() {
        assert!(is_video_content(None, "/media/movie.mkv?x=1"));
        assert!(is_audio_content(None, "track.flac"));
    }

    #[test]
    fn octet_stream_falls_back_to_extension() {
        let url = "https://example.com/download/podcast.m4a";
        assert!(is_audio_content(Some("application/octet-stream"), url));
        assert!(!is_video_content(Some("application/octet-stream"), url));
    }

    #[test]
    fn nothing_recognized() {
        assert!(!is_video_content(None, "https://example.com/"));
        assert!(!is_audio_content(Some("text/html"), "https://example.com/index.html"));
        assert!(!is_video_content(None, "https://example.com/.mp4"));
        assert!(!is_video_content(Some(""), "not a url"));
    }

    #[test]
    fn media_kind_prefers_video() {
        assert_eq!(media_kind(true, true), MediaKind::Video);
        assert_eq!(media_kind(false, true), MediaKind::Audio);
        assert_eq!(media_kind(false, false), MediaKind::Other);
    }
}
