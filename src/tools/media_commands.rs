use crate::config::ToolSettings;
use crate::tools::process_runner::CommandLine;
use crate::tools::sprite_layout::Grid;
use crate::tools::thumbnail_scanner::THUMBNAIL_PATTERN;
use std::path::{Path, PathBuf};

/// 單一命令列的長度上限（Windows 約為 32K 字元，保留餘裕）
pub const MAX_COMMAND_LINE_CHARS: usize = 30_000;

/// 縮圖過多時傳給 montage 的檔案清單
pub const THUMBNAIL_LIST_FILE: &str = "thumbs.txt";

/// 外部影像工具的命令建構器
#[derive(Debug, Clone)]
pub struct MediaCommands {
    tools: ToolSettings,
}

impl MediaCommands {
    #[must_use]
    pub const fn new(tools: ToolSettings) -> Self {
        Self { tools }
    }

    /// 以 `fps=1/<interval>` 每隔固定秒數擷取一張縮圖
    #[must_use]
    pub fn extract_frames(
        &self,
        video_path: &Path,
        interval_secs: u32,
        work_dir: &Path,
    ) -> CommandLine {
        CommandLine::direct(&self.tools.ffmpeg)
            .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y", "-i"])
            .path_arg(video_path)
            .args(["-f", "image2", "-vf"])
            .arg(format!("fps=1/{interval_secs}"))
            .path_arg(&work_dir.join(THUMBNAIL_PATTERN))
    }

    /// 等比例縮放到指定寬度，直接覆寫原檔
    ///
    /// 縮圖很多時拆成數個命令，每個命令列都不超過 [`MAX_COMMAND_LINE_CHARS`]
    #[must_use]
    pub fn resize_thumbnails(&self, thumbnails: &[PathBuf], width: u32) -> Vec<CommandLine> {
        let base = || {
            CommandLine::direct(&self.tools.mogrify)
                .arg("-resize")
                .arg(format!("{width}x"))
        };
        let base_len = base().to_string().len();

        let mut commands = Vec::new();
        let mut current = base();
        let mut current_len = base_len;
        let mut pending = 0;
        for thumb in thumbnails {
            let len = argument_len(thumb);
            if pending > 0 && current_len + len > MAX_COMMAND_LINE_CHARS {
                commands.push(std::mem::replace(&mut current, base()));
                current_len = base_len;
                pending = 0;
            }
            current = current.path_arg(thumb);
            current_len += len;
            pending += 1;
        }
        if pending > 0 {
            commands.push(current);
        }
        commands
    }

    /// 依傳入順序拼接縮圖，網格固定為 `grid`
    #[must_use]
    pub fn tile_thumbnails(
        &self,
        thumbnails: &[PathBuf],
        grid: Grid,
        output_path: &Path,
    ) -> CommandLine {
        thumbnails
            .iter()
            .fold(self.montage(grid), |cmd, thumb| cmd.path_arg(thumb))
            .path_arg(output_path)
    }

    /// 以 ImageMagick 的 `@<清單檔>` 語法拼接，清單內容見 [`thumbnail_list`]
    #[must_use]
    pub fn tile_thumbnail_list(
        &self,
        list_file: &Path,
        grid: Grid,
        output_path: &Path,
    ) -> CommandLine {
        let mut list_arg = std::ffi::OsString::from("@");
        list_arg.push(list_file.as_os_str());
        self.montage(grid).arg(list_arg).path_arg(output_path)
    }

    fn montage(&self, grid: Grid) -> CommandLine {
        CommandLine::direct(&self.tools.montage)
            .args(["-mode", "Concatenate", "-tile"])
            .arg(grid.tile_arg())
    }
}

/// montage 清單檔內容：每行一個以雙引號包住的路徑
#[must_use]
pub fn thumbnail_list(thumbnails: &[PathBuf]) -> String {
    thumbnails
        .iter()
        .map(|thumb| format!("\"{}\"\n", thumb.display()))
        .collect()
}

/// 參數在命令列中佔用的長度，含分隔空白與可能的引號
fn argument_len(path: &Path) -> usize {
    path.as_os_str().len() + 3
}
