use std::path::PathBuf;
use thiserror::Error;

/// 命令列參數：`<videoPath> [outputPath] [thumbRateSeconds] [thumbWidth]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub video_path: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub interval_secs: Option<u32>,
    pub thumb_width: Option<u32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("missing video path")]
    MissingVideo,
    #[error("video file {} does not exist", .0.display())]
    VideoNotFound(PathBuf),
    #[error("invalid {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

impl CliArgs {
    pub fn parse(args: &[String], home: Option<&str>) -> Result<Self, ArgsError> {
        let video = args.first().ok_or(ArgsError::MissingVideo)?;
        let video_path = PathBuf::from(expand_video_path(video, home));
        if !video_path.is_file() {
            return Err(ArgsError::VideoNotFound(video_path));
        }

        let output_dir = args.get(1).map(PathBuf::from);
        let interval_secs = args
            .get(2)
            .map(|v| parse_positive("thumbRateSeconds", v))
            .transpose()?;
        let thumb_width = args
            .get(3)
            .map(|v| parse_positive("thumbWidth", v))
            .transpose()?;

        Ok(Self {
            video_path,
            output_dir,
            interval_secs,
            thumb_width,
        })
    }
}

/// 將 `~` 展開為家目錄，並合併重複的 `/`
fn expand_video_path(raw: &str, home: Option<&str>) -> String {
    let expanded = match (raw.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => format!("{home}{rest}"),
        _ => raw.to_string(),
    };
    expanded.replace("//", "/")
}

fn parse_positive(name: &'static str, value: &str) -> Result<u32, ArgsError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ArgsError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}
