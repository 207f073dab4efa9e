//! Parse size and type out of raw response header values.

/// Total size from a `Content-Range` value of the form `bytes <start>-<end>/<total>`.
///
/// The unit token is matched case-insensitively. Returns `None` for any other
/// shape, including an unknown total (`bytes 0-0/*`) or a missing `/total`.
pub fn extract_size_from_content_range(value: &str) -> Option<u64> {
    let value = value.trim();
    let (unit, rest) = value.split_once(char::is_whitespace)?;
    if !unit.eq_ignore_ascii_case("bytes") {
        return None;
    }
    let (span, total) = rest.trim_start().split_once('/')?;
    let (start, end) = span.split_once('-')?;
    if !is_digits(start) || !is_digits(end) || !is_digits(total) {
        return None;
    }
    total.parse::<u64>().ok()
}

/// Size from a `Content-Length` value.
///
/// Integer-prefix parsing, not strict validation: leading whitespace and an
/// optional `+` are accepted and parsing stops at the first non-digit, so
/// `"12.5"` yields 12. Returns `None` when no digits lead the value or it is negative.
pub fn extract_size_from_content_length(value: &str) -> Option<u64> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse::<u64>().ok()
}

/// Lowercased media type with parameters stripped: `"Video/MP4; codecs=x"` -> `"video/mp4"`.
pub fn normalize_content_type(value: &str) -> Option<String> {
    let essence = value.split(';').next().unwrap_or_default().trim();
    if essence.is_empty() {
        return None;
    }
    Some(essence.to_ascii_lowercase())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
