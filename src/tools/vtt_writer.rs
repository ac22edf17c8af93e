use crate::error::{PreviewError, PreviewResult};
use crate::tools::cue_timing::CueTiming;
use crate::tools::sprite_layout::{SpriteLayout, TileRect};
use std::fmt::Write;
use std::time::Duration;

/// 單一 WebVTT cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub timing: CueTiming,
    pub rect: TileRect,
}

/// 格式化為 `HH:MM:SS.mmm`（四捨五入到毫秒）
#[must_use]
pub fn format_timestamp(time: Duration) -> String {
    let total_ms = (time.as_nanos() + 500_000) / 1_000_000;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// 每個網格位置一個 cue，包含沒有實際縮圖的補齊位置
pub fn build_cues(layout: &SpriteLayout, timings: &[CueTiming]) -> PreviewResult<Vec<Cue>> {
    let tile_count = layout.tile_count();
    if timings.len() != tile_count as usize {
        return Err(PreviewError::Configuration(format!(
            "expected {tile_count} cue timings for a {}x{} grid, got {}",
            layout.columns,
            layout.rows,
            timings.len()
        )));
    }

    Ok(timings
        .iter()
        .zip(0..tile_count)
        .map(|(timing, index)| Cue {
            timing: *timing,
            rect: layout.tile_rect(index),
        })
        .collect())
}

/// 產生 WebVTT 內容
pub fn render(
    layout: &SpriteLayout,
    timings: &[CueTiming],
    sprite_file_name: &str,
) -> PreviewResult<Vec<u8>> {
    let cues = build_cues(layout, timings)?;

    let mut vtt = String::from("WEBVTT\n\n");
    for cue in &cues {
        // String 的 fmt::Write 不會失敗
        let _ = write!(
            vtt,
            "{} --> {}\n{sprite_file_name}#xywh={},{},{},{}\n\n",
            format_timestamp(cue.timing.start),
            format_timestamp(cue.timing.end),
            cue.rect.x,
            cue.rect.y,
            cue.rect.width,
            cue.rect.height
        );
    }

    Ok(vtt.into_bytes())
}
