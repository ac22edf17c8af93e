use crate::error::{PreviewError, PreviewResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub fn validate_file_exists(path: &Path) -> PreviewResult<()> {
    if !path.exists() {
        return Err(PreviewError::Configuration(format!(
            "file does not exist: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(PreviewError::Configuration(format!(
            "not a file: {}",
            path.display()
        )));
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> PreviewResult<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            PreviewError::io(format!("cannot create directory {}", path.display()), e)
        })?;
    }
    Ok(())
}

/// 清空並重建資料夾
pub fn recreate_directory(path: &Path) -> PreviewResult<()> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| {
            PreviewError::io(format!("cannot clear directory {}", path.display()), e)
        })?;
    }
    ensure_directory_exists(path)
}

/// 轉為絕對路徑並移除 `.` 與 `..`，不存取檔案系統，也不解析符號連結
pub fn normalize_path(path: &Path) -> PreviewResult<PathBuf> {
    let absolute = std::path::absolute(path)
        .map_err(|e| PreviewError::io(format!("cannot resolve {}", path.display()), e))?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}
