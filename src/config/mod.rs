pub mod load;
pub mod types;

pub use load::SETTINGS_FILE;
pub use types::{
    Config, DEFAULT_THUMB_INTERVAL_SECS, DEFAULT_THUMB_WIDTH, Language, ToolSettings,
    UserSettings,
};
