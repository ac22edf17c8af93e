use crate::error::{PreviewError, PreviewResult};
use log::debug;
use std::path::Path;

/// 縮圖網格（欄 x 列）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
}

impl Grid {
    #[must_use]
    pub const fn cell_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// `montage -tile` 參數，例如 `4x4`
    #[must_use]
    pub fn tile_arg(&self) -> String {
        format!("{}x{}", self.columns, self.rows)
    }
}

/// 計算縮圖網格：`columns = rows = ceil(sqrt(count))`
///
/// 拼接縮圖與計算 VTT 座標都必須使用這個函式，否則 cue 會與圖塊錯位
pub fn compute_grid(thumbnail_count: usize) -> PreviewResult<Grid> {
    if thumbnail_count == 0 {
        return Err(PreviewError::Configuration(
            "thumbnail count must be positive".to_string(),
        ));
    }

    let side = ceil_sqrt(thumbnail_count);
    let side = u32::try_from(side).map_err(|_| {
        PreviewError::Configuration(format!("too many thumbnails: {thumbnail_count}"))
    })?;

    Ok(Grid {
        columns: side,
        rows: side,
    })
}

fn ceil_sqrt(n: usize) -> usize {
    let root = n.isqrt();
    if root * root == n { root } else { root + 1 }
}

/// 預覽圖佈局：單張縮圖尺寸與網格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteLayout {
    pub thumb_width: u32,
    pub thumb_height: u32,
    pub columns: u32,
    pub rows: u32,
}

impl SpriteLayout {
    #[must_use]
    pub const fn new(thumb_width: u32, thumb_height: u32, grid: Grid) -> Self {
        Self {
            thumb_width,
            thumb_height,
            columns: grid.columns,
            rows: grid.rows,
        }
    }

    #[must_use]
    pub const fn grid(&self) -> Grid {
        Grid {
            columns: self.columns,
            rows: self.rows,
        }
    }

    #[must_use]
    pub const fn tile_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// 預覽圖總尺寸
    #[must_use]
    pub const fn sprite_size(&self) -> (u32, u32) {
        (
            self.columns * self.thumb_width,
            self.rows * self.thumb_height,
        )
    }

    /// 第 `index` 個圖塊在預覽圖中的矩形 (x, y, w, h)，以列為主序
    #[must_use]
    pub const fn tile_rect(&self, index: u32) -> TileRect {
        let column = index % self.columns;
        let row = index / self.columns;
        TileRect {
            x: column * self.thumb_width,
            y: row * self.thumb_height,
            width: self.thumb_width,
            height: self.thumb_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 讀取縮圖的像素尺寸（只解析檔頭）
pub fn measure_thumbnail(path: &Path) -> PreviewResult<(u32, u32)> {
    let (width, height) =
        image::image_dimensions(path).map_err(|source| PreviewError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("縮圖尺寸 {width}x{height}: {}", path.display());
    Ok((width, height))
}
