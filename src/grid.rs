use crate::error::{Error, Result};
use crate::palette::Palette;
use image::imageops::{self, FilterType};
use image::RgbImage;
use log::debug;

/// Grid resolution `(cols, rows)` for an image, keeping its aspect ratio.
///
/// Images narrower than `max_cols` keep their width.
pub fn grid_size(width: u32, height: u32, max_cols: u32) -> Result<(u32, u32)> {
    if width == 0 || height == 0 || max_cols == 0 {
        return Err(Error::EmptyGrid);
    }
    let cols = max_cols.min(width);
    let (w, h, c) = (width as u64, height as u64, cols as u64);
    let rows = ((2 * h * c + w) / (2 * w)).max(1) as u32;
    Ok((cols, rows))
}

/// Shrinks `img` to at most `max_cols` columns, one pixel per puzzle cell.
pub fn downsample(img: &RgbImage, max_cols: u32) -> Result<RgbImage> {
    let (cols, rows) = grid_size(img.width(), img.height(), max_cols)?;
    if (cols, rows) == img.dimensions() {
        return Ok(img.clone());
    }
    debug!(
        "grid: downsampling {}x{} to {cols}x{rows}",
        img.width(),
        img.height()
    );
    Ok(imageops::resize(img, cols, rows, FilterType::Triangle))
}

/// Row-major palette indices, one per puzzle cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    cols: usize,
    rows: usize,
    cells: Vec<usize>,
}

impl PixelGrid {
    /// Assigns every pixel of `img` its nearest palette color.
    pub fn classify(img: &RgbImage, palette: &Palette) -> Result<Self> {
        if img.width() == 0 || img.height() == 0 {
            return Err(Error::EmptyGrid);
        }
        let cells = img
            .pixels()
            .map(|p| palette.nearest_index(*p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            cols: img.width() as usize,
            rows: img.height() as usize,
            cells,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    pub fn row(&self, row: usize) -> Option<&[usize]> {
        (row < self.rows).then(|| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    /// Number of cells painted with palette `index`.
    pub fn count_of(&self, index: usize) -> usize {
        self.cells.iter().filter(|&&c| c == index).count()
    }
}
