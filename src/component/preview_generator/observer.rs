use super::job::PreviewJob;
use crate::error::PipelineError;
use crate::tools::{CommandLine, ProcessOutput};
use log::{debug, error, info, warn};
use std::fmt;
use std::sync::Arc;

/// 管線狀態，依序推進
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    Created,
    ToolsVerified,
    ThumbnailsExtracted,
    ThumbnailsResized,
    Tiled,
    MetadataRead,
    VttWritten,
    Done,
}

impl PipelineState {
    pub const ALL: [Self; 8] = [
        Self::Created,
        Self::ToolsVerified,
        Self::ThumbnailsExtracted,
        Self::ThumbnailsResized,
        Self::Tiled,
        Self::MetadataRead,
        Self::VttWritten,
        Self::Done,
    ];

    /// 在 [`Self::ALL`] 中的位置
    #[must_use]
    pub const fn step(self) -> u64 {
        self as u64
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 管線事件的接收者，注入到管線與子程序閘道
///
/// 所有方法都有空的預設實作
pub trait PipelineObserver: Send + Sync {
    fn state_changed(&self, _job: &PreviewJob, _state: PipelineState) {}

    fn job_failed(&self, _job: &PreviewJob, _error: &PipelineError) {}

    fn command_started(&self, _command: &CommandLine) {}

    fn command_finished(&self, _command: &CommandLine, _output: &ProcessOutput) {}
}

/// 轉送到 `log` 的觀察者
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn state_changed(&self, job: &PreviewJob, state: PipelineState) {
        match state {
            PipelineState::Done => info!(
                "[{}] 預覽圖已建立: {}",
                job.name(),
                job.output_dir().display()
            ),
            _ => info!("[{}] {state}", job.name()),
        }
    }

    fn job_failed(&self, job: &PreviewJob, error: &PipelineError) {
        error!("[{}] {error}", job.name());
    }

    fn command_started(&self, command: &CommandLine) {
        debug!("執行: {command}");
    }

    fn command_finished(&self, command: &CommandLine, output: &ProcessOutput) {
        if !output.is_success() {
            warn!(
                "`{}` 結束碼 {:?}: {}",
                command.program(),
                output.exit_code,
                output.stderr.trim()
            );
        }
    }
}

/// 同時通知多個觀察者
pub struct ObserverFanout {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl ObserverFanout {
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl PipelineObserver for ObserverFanout {
    fn state_changed(&self, job: &PreviewJob, state: PipelineState) {
        for observer in &self.observers {
            observer.state_changed(job, state);
        }
    }

    fn job_failed(&self, job: &PreviewJob, error: &PipelineError) {
        for observer in &self.observers {
            observer.job_failed(job, error);
        }
    }

    fn command_started(&self, command: &CommandLine) {
        for observer in &self.observers {
            observer.command_started(command);
        }
    }

    fn command_finished(&self, command: &CommandLine, output: &ProcessOutput) {
        for observer in &self.observers {
            observer.command_finished(command, output);
        }
    }
}
