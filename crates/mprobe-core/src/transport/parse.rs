//! Parse raw header lines collected by libcurl.

/// Header pairs of the last response in `lines`.
///
/// libcurl reports headers of every hop when following redirects (and of
/// interim `100 Continue` responses); each status line starts a new block, so
/// only the final block is kept.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    headers
}
