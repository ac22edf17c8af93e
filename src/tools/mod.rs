mod cue_timing;
mod media_commands;
mod path_validator;
mod process_runner;
mod sprite_layout;
mod thumbnail_scanner;
mod tool_installer;
mod vtt_writer;

pub use cue_timing::{CueTiming, compute_cue_timings, cue_span};
pub use media_commands::{
    MAX_COMMAND_LINE_CHARS, MediaCommands, THUMBNAIL_LIST_FILE, thumbnail_list,
};
pub use path_validator::{
    ensure_directory_exists, normalize_path, recreate_directory, validate_file_exists,
};
pub use process_runner::{CommandLine, ProcessOutput, ProcessRunner, SystemProcessRunner};
pub use sprite_layout::{Grid, SpriteLayout, TileRect, compute_grid, measure_thumbnail};
pub use thumbnail_scanner::{THUMBNAIL_PATTERN, scan_thumbnails, thumbnail_index};
pub use tool_installer::{Platform, ToolInstaller};
pub use vtt_writer::{Cue, build_cues, format_timestamp, render};
