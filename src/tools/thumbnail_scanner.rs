use crate::error::{PreviewError, PreviewResult};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// 縮圖檔名樣式，與 ffmpeg 輸出樣式 `thumb%03d.jpg` 對應
pub const THUMBNAIL_PATTERN: &str = "thumb%03d.jpg";

static REGEX_THUMBNAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^thumb(\d+)\.jpg$").expect("Invalid regex"));

/// 取出縮圖檔名中的序號
#[must_use]
pub fn thumbnail_index(file_name: &str) -> Option<u64> {
    REGEX_THUMBNAIL
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// 列出資料夾中的縮圖，依序號排序
///
/// 以數值排序，所以 `thumb1000.jpg` 排在 `thumb999.jpg` 之後
pub fn scan_thumbnails(directory: &Path) -> PreviewResult<Vec<PathBuf>> {
    let mut thumbnails = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let context = format!("cannot list thumbnails in {}", directory.display());
            match e.into_io_error() {
                Some(source) => PreviewError::io(context, source),
                None => PreviewError::io(context, std::io::Error::other("filesystem loop")),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let index = entry.file_name().to_str().and_then(thumbnail_index);
        if let Some(index) = index {
            thumbnails.push((index, entry.into_path()));
        }
    }

    thumbnails.sort_by_key(|(index, _)| *index);
    Ok(thumbnails.into_iter().map(|(_, path)| path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_thumbnail_index() {
        assert_eq!(thumbnail_index("thumb001.jpg"), Some(1));
        assert_eq!(thumbnail_index("thumb1000.jpg"), Some(1000));
        assert_eq!(thumbnail_index("thumb.jpg"), None);
        assert_eq!(thumbnail_index("sprite.jpg"), None);
        assert_eq!(thumbnail_index("thumb001.png"), None);
    }

    #[test]
    fn test_scan_thumbnails_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["thumb1000.jpg", "thumb002.jpg", "thumb999.jpg", "thumb001.jpg", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("thumb003.jpg")).unwrap();

        let names: Vec<_> = scan_thumbnails(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(
            names,
            vec!["thumb001.jpg", "thumb002.jpg", "thumb999.jpg", "thumb1000.jpg"]
        );
    }

    #[test]
    fn test_scan_thumbnails_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            scan_thumbnails(&dir.path().join("missing")),
            Err(PreviewError::Io { .. })
        ));
    }
}
