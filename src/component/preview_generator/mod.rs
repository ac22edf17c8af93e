//! 影片預覽圖（sprite + WebVTT）產生元件
//!
//! 擷取縮圖、縮放、拼接、量測尺寸、寫出 VTT，依序執行

mod job;
mod main;
mod observer;

pub use job::{
    PreviewArtifact, PreviewBytes, PreviewJob, SPRITE_FILE_NAME, ThumbnailSet, VTT_FILE_NAME,
};
pub use main::{PipelineOptions, PreviewPipeline, ToolProvisioning};
pub use observer::{LogObserver, ObserverFanout, PipelineObserver, PipelineState};
