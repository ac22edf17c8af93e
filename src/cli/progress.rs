use crate::component::preview_generator::{PipelineObserver, PipelineState};
use crate::error::PipelineError;
use crate::PreviewJob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_i18n::t;

/// 以進度條顯示管線狀態
pub struct ProgressObserver {
    progress_bar: ProgressBar,
}

impl ProgressObserver {
    #[must_use]
    pub fn new() -> Self {
        let progress_bar = ProgressBar::new(PipelineState::Done.step());
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        progress_bar.set_style(style);
        Self { progress_bar }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineObserver for ProgressObserver {
    fn state_changed(&self, job: &PreviewJob, state: PipelineState) {
        let message = format!("{} - {}", job.name(), state_label(state));
        self.progress_bar.set_position(state.step());
        if state == PipelineState::Done {
            self.progress_bar.finish_with_message(message);
        } else {
            self.progress_bar.set_message(message);
        }
    }

    fn job_failed(&self, job: &PreviewJob, _error: &PipelineError) {
        self.progress_bar
            .abandon_with_message(format!("{} - {}", job.name(), t!("state.Failed")));
    }
}

fn state_label(state: PipelineState) -> String {
    match state {
        PipelineState::Created => t!("state.Created").to_string(),
        PipelineState::ToolsVerified => t!("state.ToolsVerified").to_string(),
        PipelineState::ThumbnailsExtracted => t!("state.ThumbnailsExtracted").to_string(),
        PipelineState::ThumbnailsResized => t!("state.ThumbnailsResized").to_string(),
        PipelineState::Tiled => t!("state.Tiled").to_string(),
        PipelineState::MetadataRead => t!("state.MetadataRead").to_string(),
        PipelineState::VttWritten => t!("state.VttWritten").to_string(),
        PipelineState::Done => t!("state.Done").to_string(),
    }
}
