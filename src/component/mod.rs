//! 功能元件模組

pub mod preview_generator;

pub use preview_generator::PreviewPipeline;
