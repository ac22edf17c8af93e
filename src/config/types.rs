use serde::{Deserialize, Serialize};

pub const DEFAULT_THUMB_INTERVAL_SECS: u32 = 1;
pub const DEFAULT_THUMB_WIDTH: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    English,
    #[serde(rename = "zh-TW")]
    TraditionalChinese,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::TraditionalChinese => "zh-TW",
        }
    }
}

/// 外部工具的執行檔名稱或路徑
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub ffmpeg: String,
    pub mogrify: String,
    pub montage: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            mogrify: "mogrify".to_string(),
            montage: "montage".to_string(),
        }
    }
}

/// 使用者設定（settings.json）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub thumb_interval_secs: u32,
    pub thumb_width: u32,
    /// 產生預覽圖後刪除縮圖暫存資料夾
    pub cleanup_thumbnails: bool,
    /// 找不到工具時透過套件管理器安裝
    pub install_missing_tools: bool,
    pub tools: ToolSettings,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            thumb_interval_secs: DEFAULT_THUMB_INTERVAL_SECS,
            thumb_width: DEFAULT_THUMB_WIDTH,
            cleanup_thumbnails: true,
            install_missing_tools: true,
            tools: ToolSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: UserSettings,
}
