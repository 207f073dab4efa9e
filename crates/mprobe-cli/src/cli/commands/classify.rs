//! `mprobe classify <url>` – offline classification, no network access.

use anyhow::Result;
use mprobe_core::{
    apply_platform_quirks, is_audio_content, is_video_content, normalize_content_type,
    quirk_reason,
};

pub fn run_classify(url: &str, content_type: Option<&str>, quirks: bool, json: bool) -> Result<()> {
    let original = content_type.and_then(normalize_content_type);
    let corrected = if quirks {
        apply_platform_quirks(url, original.as_deref()).and_then(|ct| normalize_content_type(&ct))
    } else {
        original.clone()
    };
    let reason = quirk_reason(url, original.as_deref(), corrected.as_deref());
    let is_video = is_video_content(corrected.as_deref(), url);
    let is_audio = is_audio_content(corrected.as_deref(), url);

    if json {
        let value = serde_json::json!({
            "url": url,
            "contentType": corrected,
            "isVideo": is_video,
            "isAudio": is_audio,
            "quirk": reason,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{url}");
    println!("  type:  {}", corrected.as_deref().unwrap_or("-"));
    println!("  video: {is_video}");
    println!("  audio: {is_audio}");
    if let Some(reason) = reason {
        println!("  quirk: {reason}");
    }
    Ok(())
}
