pub mod cli;
pub mod component;
pub mod config;
pub mod error;
pub mod init;
pub mod signal;
pub mod tools;

rust_i18n::i18n!("locales", fallback = "en-US");

pub use component::preview_generator::{
    PipelineObserver, PipelineOptions, PipelineState, PreviewArtifact, PreviewBytes, PreviewJob,
    PreviewPipeline, ToolProvisioning,
};
pub use error::{PipelineError, PreviewError, PreviewResult, Stage};
