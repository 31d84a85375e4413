use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot quantize an empty sample set")]
    EmptySamples,

    #[error("cannot classify against an empty palette")]
    EmptyPalette,

    #[error("grid dimensions cannot be zero")]
    EmptyGrid,

    #[error("color number {index} is not in the palette of {len} colors")]
    UnknownColor { index: usize, len: usize },

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
