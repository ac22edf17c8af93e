use crate::config::{DEFAULT_THUMB_INTERVAL_SECS, DEFAULT_THUMB_WIDTH};
use crate::error::{PreviewError, PreviewResult};
use crate::tools::{SpriteLayout, validate_file_exists};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SPRITE_FILE_NAME: &str = "sprite.jpg";
pub const VTT_FILE_NAME: &str = "thumbs.vtt";
const SPRITE_PARTIAL_FILE_NAME: &str = "sprite.partial.jpg";
const VTT_PARTIAL_FILE_NAME: &str = "thumbs.partial.vtt";
const THUMBNAIL_DIR_NAME: &str = "thumbs";

/// 單一影片的預覽圖工作
///
/// 建立後不可變；工作期間獨佔 `work_dir`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewJob {
    video_path: PathBuf,
    interval_secs: u32,
    thumb_width: u32,
    output_dir: PathBuf,
    work_dir: PathBuf,
}

impl PreviewJob {
    /// 未指定輸出資料夾時使用 `<影片資料夾>/previews/<影片檔名>/`
    pub fn new(
        video_path: impl Into<PathBuf>,
        output_dir: Option<PathBuf>,
        interval_secs: u32,
        thumb_width: u32,
    ) -> PreviewResult<Self> {
        let video_path = video_path.into();
        if video_path.as_os_str().is_empty() {
            return Err(PreviewError::Configuration(
                "video path is required".to_string(),
            ));
        }
        validate_file_exists(&video_path)?;

        if interval_secs == 0 {
            return Err(PreviewError::Configuration(
                "thumbnail interval must be positive".to_string(),
            ));
        }
        if thumb_width == 0 {
            return Err(PreviewError::Configuration(
                "thumbnail width must be positive".to_string(),
            ));
        }

        let output_dir = match output_dir {
            Some(dir) => dir,
            None => default_output_dir(&video_path)?,
        };
        let work_dir = output_dir.join(THUMBNAIL_DIR_NAME);

        Ok(Self {
            video_path,
            interval_secs,
            thumb_width,
            output_dir,
            work_dir,
        })
    }

    pub fn with_defaults(video_path: impl Into<PathBuf>) -> PreviewResult<Self> {
        Self::new(
            video_path,
            None,
            DEFAULT_THUMB_INTERVAL_SECS,
            DEFAULT_THUMB_WIDTH,
        )
    }

    /// 輸出到系統暫存資料夾下唯一名稱的資料夾，適合同時執行多個工作
    pub fn scratch(
        video_path: impl Into<PathBuf>,
        interval_secs: u32,
        thumb_width: u32,
    ) -> PreviewResult<Self> {
        let scratch_dir =
            std::env::temp_dir().join(format!("vtt_video_previews-{}", uuid::Uuid::new_v4()));
        Self::new(video_path, Some(scratch_dir), interval_secs, thumb_width)
    }

    #[must_use]
    pub fn video_path(&self) -> &Path {
        &self.video_path
    }

    #[must_use]
    pub const fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    #[must_use]
    pub fn sampling_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_secs))
    }

    #[must_use]
    pub const fn thumb_width(&self) -> u32 {
        self.thumb_width
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    #[must_use]
    pub fn sprite_path(&self) -> PathBuf {
        self.output_dir.join(SPRITE_FILE_NAME)
    }

    #[must_use]
    pub fn vtt_path(&self) -> PathBuf {
        self.output_dir.join(VTT_FILE_NAME)
    }

    pub(crate) fn partial_sprite_path(&self) -> PathBuf {
        self.output_dir.join(SPRITE_PARTIAL_FILE_NAME)
    }

    pub(crate) fn partial_vtt_path(&self) -> PathBuf {
        self.output_dir.join(VTT_PARTIAL_FILE_NAME)
    }

    /// 顯示用名稱（影片檔名）
    #[must_use]
    pub fn name(&self) -> String {
        self.video_path
            .file_name()
            .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string())
    }
}

fn default_output_dir(video_path: &Path) -> PreviewResult<PathBuf> {
    let stem = video_path.file_stem().ok_or_else(|| {
        PreviewError::Configuration(format!(
            "cannot derive output directory from {}",
            video_path.display()
        ))
    })?;
    let parent = video_path.parent().unwrap_or(Path::new("."));
    Ok(parent.join("previews").join(stem))
}

/// 擷取出的縮圖，依擷取（即播放）時間排序，至少一張
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailSet {
    paths: Vec<PathBuf>,
}

impl ThumbnailSet {
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Option<Self> {
        if paths.is_empty() {
            None
        } else {
            Some(Self { paths })
        }
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// 用來量測尺寸的代表縮圖
    #[must_use]
    pub fn first(&self) -> &Path {
        &self.paths[0]
    }
}

/// 完成的預覽圖輸出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArtifact {
    pub output_dir: PathBuf,
    pub sprite_path: PathBuf,
    pub vtt_path: PathBuf,
    pub layout: SpriteLayout,
    pub thumbnail_count: usize,
}

/// 讀入記憶體的預覽圖與 VTT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewBytes {
    pub sprite: Vec<u8>,
    pub vtt: Vec<u8>,
}
