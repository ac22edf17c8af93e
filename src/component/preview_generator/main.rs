use super::job::{PreviewArtifact, PreviewBytes, PreviewJob, SPRITE_FILE_NAME, ThumbnailSet};
use super::observer::{LogObserver, PipelineObserver, PipelineState};
use crate::config::{ToolSettings, UserSettings};
use crate::error::{PipelineError, PreviewError, PreviewResult, Stage, StageContext};
use crate::tools::{
    CommandLine, Grid, MediaCommands, ProcessRunner, SpriteLayout, ToolInstaller,
    MAX_COMMAND_LINE_CHARS, THUMBNAIL_LIST_FILE, compute_cue_timings, compute_grid, cue_span,
    ensure_directory_exists, measure_thumbnail, normalize_path, recreate_directory, render,
    scan_thumbnails, thumbnail_list,
};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 工具檢查方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolProvisioning {
    /// 缺少時透過套件管理器安裝
    Install,
    /// 只檢查，缺少時直接失敗
    Verify,
    /// 不檢查
    Skip,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub tools: ToolSettings,
    pub provisioning: ToolProvisioning,
    pub cleanup_thumbnails: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&UserSettings::default())
    }
}

impl From<&UserSettings> for PipelineOptions {
    fn from(settings: &UserSettings) -> Self {
        Self {
            tools: settings.tools.clone(),
            provisioning: if settings.install_missing_tools {
                ToolProvisioning::Install
            } else {
                ToolProvisioning::Verify
            },
            cleanup_thumbnails: settings.cleanup_thumbnails,
        }
    }
}

/// 拼接完成、尚未發布的預覽圖
struct TiledSprite {
    thumbnails: ThumbnailSet,
    grid: Grid,
    partial_path: PathBuf,
}

/// 已量測縮圖尺寸的預覽圖
struct MeasuredSprite {
    tiled: TiledSprite,
    layout: SpriteLayout,
}

/// 影片預覽圖管線
///
/// 七個階段依序執行：
/// 1. 確認工具（ffmpeg、mogrify、montage）
/// 2. 以 ffmpeg 每隔固定秒數擷取縮圖
/// 3. 以 mogrify 等比例縮放
/// 4. 以 montage 拼接為 `ceil(sqrt(n))` 見方的網格
/// 5. 量測縮圖尺寸
/// 6. 產生 VTT，並將預覽圖與 VTT 改為正式檔名
/// 7. 刪除縮圖暫存資料夾（可選）
///
/// 任一階段失敗即中止，不重試；正式檔名只在全部成功後出現。
/// 發布之後工作即視為完成，清理失敗或中斷訊號只記錄警告
pub struct PreviewPipeline {
    runner: Arc<dyn ProcessRunner>,
    observer: Arc<dyn PipelineObserver>,
    commands: MediaCommands,
    options: PipelineOptions,
    shutdown_signal: Arc<AtomicBool>,
}

impl PreviewPipeline {
    pub fn new(runner: Arc<dyn ProcessRunner>, options: PipelineOptions) -> Self {
        Self {
            runner,
            observer: Arc::new(LogObserver),
            commands: MediaCommands::new(options.tools.clone()),
            options,
            shutdown_signal: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_shutdown_signal(mut self, shutdown_signal: Arc<AtomicBool>) -> Self {
        self.shutdown_signal = shutdown_signal;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// 執行單一工作
    pub fn run(&self, job: &PreviewJob) -> Result<PreviewArtifact, PipelineError> {
        self.observer.state_changed(job, PipelineState::Created);

        let result = self.run_stages(job);
        if let Err(e) = &result {
            self.observer.job_failed(job, e);
        }
        result
    }

    fn run_stages(&self, job: &PreviewJob) -> Result<PreviewArtifact, PipelineError> {
        self.stage(job, Stage::VerifyTools, || self.verify_tools())?;
        let thumbnails = self.stage(job, Stage::Extract, || self.extract(job))?;
        let thumbnails = self.stage(job, Stage::Resize, || self.resize(job, thumbnails))?;
        let tiled = self.stage(job, Stage::Tile, || self.tile(job, thumbnails))?;
        let measured = self.stage(job, Stage::ReadMetadata, || Self::read_metadata(tiled))?;
        let artifact = self.stage(job, Stage::Serialize, || Self::serialize(job, measured))?;

        if let Err(e) = self.cleanup(job) {
            warn!("[{}] 預覽圖已完成，清理縮圖失敗: {e}", job.name());
        }
        self.observer.state_changed(job, Stage::Cleanup.completes());
        Ok(artifact)
    }

    fn stage<T>(
        &self,
        job: &PreviewJob,
        stage: Stage,
        action: impl FnOnce() -> PreviewResult<T>,
    ) -> Result<T, PipelineError> {
        if self.shutdown_signal.load(Ordering::SeqCst) {
            warn!("[{}] 收到中斷訊號，停止於 {stage}", job.name());
            return Err(PreviewError::Cancelled).at_stage(stage);
        }

        let value = action().at_stage(stage)?;
        self.observer.state_changed(job, stage.completes());
        Ok(value)
    }

    fn installers(&self) -> [ToolInstaller; 3] {
        let tools = &self.options.tools;
        [
            ToolInstaller::new(tools.ffmpeg.clone(), "ffmpeg"),
            ToolInstaller::new(tools.mogrify.clone(), "imagemagick"),
            ToolInstaller::new(tools.montage.clone(), "imagemagick"),
        ]
    }

    fn verify_tools(&self) -> PreviewResult<()> {
        for installer in self.installers() {
            match self.options.provisioning {
                ToolProvisioning::Install => installer.ensure_installed(self.runner.as_ref())?,
                ToolProvisioning::Verify => {
                    if !installer.is_installed(self.runner.as_ref())? {
                        return Err(PreviewError::ToolMissing {
                            tool: installer.tool().to_string(),
                        });
                    }
                }
                ToolProvisioning::Skip => {}
            }
        }
        Ok(())
    }

    fn execute(&self, command: &CommandLine) -> PreviewResult<()> {
        self.runner.run(command)?.into_result(command)?;
        Ok(())
    }

    fn extract(&self, job: &PreviewJob) -> PreviewResult<ThumbnailSet> {
        ensure_directory_exists(job.output_dir())?;
        for stale in [job.sprite_path(), job.vtt_path()] {
            remove_file_if_exists(&stale)?;
        }
        recreate_directory(job.work_dir())?;

        let command =
            self.commands
                .extract_frames(job.video_path(), job.interval_secs(), job.work_dir());
        self.execute(&command)?;

        let paths = scan_thumbnails(job.work_dir())?;
        debug!("[{}] 擷取 {} 張縮圖", job.name(), paths.len());

        ThumbnailSet::new(paths).ok_or_else(|| PreviewError::SubprocessFailure {
            command: command.program().to_string(),
            stderr: format!("no thumbnails were written to {}", job.work_dir().display()),
        })
    }

    fn resize(&self, job: &PreviewJob, thumbnails: ThumbnailSet) -> PreviewResult<ThumbnailSet> {
        for command in self
            .commands
            .resize_thumbnails(thumbnails.paths(), job.thumb_width())
        {
            self.execute(&command)?;
        }
        Ok(thumbnails)
    }

    fn tile(&self, job: &PreviewJob, thumbnails: ThumbnailSet) -> PreviewResult<TiledSprite> {
        let grid = compute_grid(thumbnails.len())?;
        let partial_path = job.partial_sprite_path();

        let mut command = self
            .commands
            .tile_thumbnails(thumbnails.paths(), grid, &partial_path);
        if command.to_string().len() > MAX_COMMAND_LINE_CHARS {
            let list_file = job.work_dir().join(THUMBNAIL_LIST_FILE);
            fs::write(&list_file, thumbnail_list(thumbnails.paths())).map_err(|e| {
                PreviewError::io(format!("cannot write {}", list_file.display()), e)
            })?;
            command = self
                .commands
                .tile_thumbnail_list(&list_file, grid, &partial_path);
        }
        self.execute(&command)?;

        if !partial_path.is_file() {
            return Err(PreviewError::SubprocessFailure {
                command: command.program().to_string(),
                stderr: format!("sprite was not written to {}", partial_path.display()),
            });
        }

        debug!(
            "[{}] {} 張縮圖拼接為 {}x{}",
            job.name(),
            thumbnails.len(),
            grid.columns,
            grid.rows
        );

        Ok(TiledSprite {
            thumbnails,
            grid,
            partial_path,
        })
    }

    fn read_metadata(tiled: TiledSprite) -> PreviewResult<MeasuredSprite> {
        let (width, height) = measure_thumbnail(tiled.thumbnails.first())?;
        let layout = SpriteLayout::new(width, height, tiled.grid);
        Ok(MeasuredSprite { tiled, layout })
    }

    fn serialize(job: &PreviewJob, measured: MeasuredSprite) -> PreviewResult<PreviewArtifact> {
        let MeasuredSprite { tiled, layout } = measured;

        let span = cue_span(job.sampling_interval(), layout.tile_count());
        let timings = compute_cue_timings(span, layout.tile_count())?;
        let vtt = render(&layout, &timings, SPRITE_FILE_NAME)?;

        let partial_vtt = job.partial_vtt_path();
        fs::write(&partial_vtt, vtt)
            .map_err(|e| PreviewError::io(format!("cannot write {}", partial_vtt.display()), e))?;

        let sprite_path = job.sprite_path();
        let vtt_path = job.vtt_path();
        rename(&tiled.partial_path, &sprite_path)?;
        if let Err(e) = rename(&partial_vtt, &vtt_path) {
            if let Err(rollback) = rename(&sprite_path, &tiled.partial_path) {
                warn!("[{}] {rollback}", job.name());
            }
            return Err(e);
        }

        Ok(PreviewArtifact {
            output_dir: job.output_dir().to_path_buf(),
            sprite_path,
            vtt_path,
            layout,
            thumbnail_count: tiled.thumbnails.len(),
        })
    }

    /// 只會在拼接成功之後被呼叫
    fn cleanup(&self, job: &PreviewJob) -> PreviewResult<()> {
        if !self.options.cleanup_thumbnails {
            return Ok(());
        }
        fs::remove_dir_all(job.work_dir()).map_err(|e| {
            PreviewError::io(
                format!("cannot remove thumbnails in {}", job.work_dir().display()),
                e,
            )
        })
    }

    /// 執行工作並將預覽圖與 VTT 讀入記憶體，之後刪除整個輸出資料夾
    ///
    /// 搭配 [`PreviewJob::scratch`] 使用；失敗時保留輸出資料夾供檢查
    pub fn generate_bytes(&self, job: &PreviewJob) -> Result<PreviewBytes, PipelineError> {
        let artifact = self.run(job)?;

        let read = |path: &Path| {
            fs::read(path)
                .map_err(|e| PreviewError::io(format!("cannot read {}", path.display()), e))
        };
        let bytes = PreviewBytes {
            sprite: read(&artifact.sprite_path).at_stage(Stage::Cleanup)?,
            vtt: read(&artifact.vtt_path).at_stage(Stage::Cleanup)?,
        };

        fs::remove_dir_all(job.output_dir())
            .map_err(|e| {
                PreviewError::io(
                    format!("cannot remove {}", job.output_dir().display()),
                    e,
                )
            })
            .at_stage(Stage::Cleanup)?;

        Ok(bytes)
    }

    /// 平行執行多個互相獨立的工作
    ///
    /// 每個工作必須使用不同的輸出資料夾
    pub fn run_batch(
        &self,
        jobs: &[PreviewJob],
    ) -> PreviewResult<Vec<Result<PreviewArtifact, PipelineError>>> {
        let mut seen = HashSet::new();
        for job in jobs {
            if !seen.insert(normalize_path(job.output_dir())?) {
                return Err(PreviewError::Configuration(format!(
                    "output directory {} is shared by more than one job",
                    job.output_dir().display()
                )));
            }
        }

        info!("開始產生 {} 個預覽圖", jobs.len());
        Ok(jobs.par_iter().map(|job| self.run(job)).collect())
    }
}

fn remove_file_if_exists(path: &Path) -> PreviewResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PreviewError::io(
            format!("cannot remove {}", path.display()),
            e,
        )),
    }
}

fn rename(from: &Path, to: &Path) -> PreviewResult<()> {
    fs::rename(from, to).map_err(|e| {
        PreviewError::io(
            format!("cannot move {} to {}", from.display(), to.display()),
            e,
        )
    })
}
