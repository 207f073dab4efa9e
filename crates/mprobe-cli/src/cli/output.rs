//! Text and JSON rendering of probe outcomes.

use mprobe_core::{MediaKind, ProbeError, ProbeResult};

fn kind_label(result: &ProbeResult) -> &'static str {
    match result.media_kind() {
        MediaKind::Video => "video",
        MediaKind::Audio => "audio",
        MediaKind::Other => "other",
    }
}

fn size_label(size: Option<u64>) -> String {
    size.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string())
}

/// Multi-line description for `mprobe probe`.
pub fn describe(url: &str, result: &ProbeResult) -> String {
    format!(
        "{url}\n  type:   {} ({})\n  size:   {} bytes\n  ranges: {}\n  method: {}\n",
        result.content_type.as_deref().unwrap_or("unknown"),
        kind_label(result),
        size_label(result.size),
        if result.supports_range_requests { "yes" } else { "no" },
        result.method,
    )
}

/// One aligned line for `mprobe batch`.
pub fn table_row(url: &str, result: &Result<ProbeResult, ProbeError>) -> String {
    match result {
        Ok(r) => format!(
            "ok    {:<5} {:<5} {:>12} {:<28} {}",
            r.method.to_string(),
            kind_label(r),
            size_label(r.size),
            r.content_type.as_deref().unwrap_or("-"),
            url
        ),
        Err(e) => format!("error {:<18} {}: {}", e.kind().as_str(), url, e),
    }
}

/// One JSON object per line for `mprobe batch --json`.
pub fn json_line(url: &str, result: &Result<ProbeResult, ProbeError>) -> serde_json::Value {
    match result {
        Ok(r) => serde_json::json!({ "url": url, "result": r }),
        Err(e) => serde_json::json!({
            "url": url,
            "error": {
                "kind": e.kind().as_str(),
                "statusCode": e.status_code(),
                "message": e.to_string(),
            }
        }),
    }
}
