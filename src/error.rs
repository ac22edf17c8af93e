use crate::component::preview_generator::PipelineState;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type PreviewResult<T> = std::result::Result<T, PreviewError>;

/// 預覽圖產生過程中可能發生的錯誤
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("required tool `{tool}` is not available")]
    ToolMissing { tool: String },

    #[error("command `{command}` failed: {stderr}")]
    SubprocessFailure { command: String, stderr: String },

    #[error("cannot read thumbnail metadata from {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("operation cancelled")]
    Cancelled,
}

impl PreviewError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// 管線失敗時的錯誤，標示失敗的階段
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: PreviewError,
}

/// 管線階段；每個階段成功後會進入對應的 [`PipelineState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    VerifyTools,
    Extract,
    Resize,
    Tile,
    ReadMetadata,
    Serialize,
    Cleanup,
}

impl Stage {
    #[must_use]
    pub const fn completes(self) -> PipelineState {
        match self {
            Self::VerifyTools => PipelineState::ToolsVerified,
            Self::Extract => PipelineState::ThumbnailsExtracted,
            Self::Resize => PipelineState::ThumbnailsResized,
            Self::Tile => PipelineState::Tiled,
            Self::ReadMetadata => PipelineState::MetadataRead,
            Self::Serialize => PipelineState::VttWritten,
            Self::Cleanup => PipelineState::Done,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VerifyTools => "verify tools",
            Self::Extract => "extract",
            Self::Resize => "resize",
            Self::Tile => "tile",
            Self::ReadMetadata => "read metadata",
            Self::Serialize => "serialize",
            Self::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

pub(crate) trait StageContext<T> {
    fn at_stage(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T> StageContext<T> for PreviewResult<T> {
    fn at_stage(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|source| PipelineError { stage, source })
    }
}
