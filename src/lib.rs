pub mod error;
pub mod grid;
pub mod median_cut;
pub mod palette;
pub mod render;
pub mod session;

pub use self::error::{Error, Result};
pub use self::grid::PixelGrid;
pub use self::median_cut::quantize;
pub use self::palette::{nearest_index, Palette, PaletteEntry};
pub use self::session::{FillOutcome, GameSession};

use image::{DynamicImage, ImageReader, Rgb};
use log::debug;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzleConfig {
    /// Requested palette size; the puzzle may use fewer.
    pub colors: usize,
    /// Widest grid allowed, in cells.
    pub max_cols: u32,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            colors: 8,
            max_cols: 40,
        }
    }
}

/// A palette and the grid of palette indices it numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    palette: Palette,
    grid: PixelGrid,
}

impl Puzzle {
    pub fn open<P: AsRef<Path>>(path: P, config: &PuzzleConfig) -> Result<Self> {
        let img = ImageReader::open(path)?.decode()?;
        Self::from_image(&img, config)
    }

    pub fn from_image(img: &DynamicImage, config: &PuzzleConfig) -> Result<Self> {
        let cells = grid::downsample(&img.to_rgb8(), config.max_cols)?;
        let samples: Vec<Rgb<u8>> = cells.pixels().copied().collect();
        let palette = quantize(&samples, config.colors)?;
        let grid = PixelGrid::classify(&cells, &palette)?;
        debug!(
            "puzzle: {}x{} cells, {} colors",
            grid.cols(),
            grid.rows(),
            palette.len()
        );
        Ok(Self { palette, grid })
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }
}
