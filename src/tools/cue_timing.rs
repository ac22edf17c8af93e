use crate::error::{PreviewError, PreviewResult};
use std::time::Duration;

/// 單一 cue 的時間區間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueTiming {
    pub start: Duration,
    pub end: Duration,
}

/// 將總時長平均分配給每個圖塊
///
/// 邊界以整數奈秒計算，相鄰 cue 共用同一個邊界值，最後一個 cue 的結束時間等於 `total`
pub fn compute_cue_timings(total: Duration, tile_count: u32) -> PreviewResult<Vec<CueTiming>> {
    if tile_count == 0 {
        return Err(PreviewError::Configuration(
            "tile count must be positive".to_string(),
        ));
    }
    if total.is_zero() {
        return Err(PreviewError::Configuration(
            "total duration must be positive".to_string(),
        ));
    }

    let total_nanos = total.as_nanos();
    let count = u128::from(tile_count);
    let boundary = |index: u128| -> Duration {
        let nanos = total_nanos * index / count;
        Duration::new(
            (nanos / 1_000_000_000) as u64,
            (nanos % 1_000_000_000) as u32,
        )
    };

    Ok((0..count)
        .map(|i| CueTiming {
            start: boundary(i),
            end: boundary(i + 1),
        })
        .collect())
}

/// 每張縮圖代表的取樣間隔乘以圖塊數
///
/// 這裡刻意不使用影片實際長度：網格補齊的空白圖塊也分配到一個取樣間隔
#[must_use]
pub fn cue_span(sampling_interval: Duration, tile_count: u32) -> Duration {
    sampling_interval * tile_count
}
