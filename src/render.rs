use crate::Puzzle;
use image::RgbImage;
use std::io::{Result, Write};

/// Palette legend followed by the numbered grid. Numbers are 1-based.
pub fn write_chart<W: Write>(puzzle: &Puzzle, w: &mut W) -> Result<()> {
    let palette = puzzle.palette();
    let width = palette.len().to_string().len();
    for (i, entry) in palette.iter().enumerate() {
        writeln!(w, "{:>width$} {entry}", i + 1)?;
    }
    writeln!(w)?;

    let grid = puzzle.grid();
    for row in grid.cells().chunks(grid.cols()) {
        let mut first = true;
        for index in row {
            if !first {
                write!(w, " ")?;
            }
            write!(w, "{:>width$}", index + 1)?;
            first = false;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// The finished picture, every cell painted `cell_px` pixels wide.
pub fn solution_image(puzzle: &Puzzle, cell_px: u32) -> RgbImage {
    let cell_px = cell_px.max(1);
    let grid = puzzle.grid();
    let palette = puzzle.palette();
    RgbImage::from_fn(
        grid.cols() as u32 * cell_px,
        grid.rows() as u32 * cell_px,
        |x, y| {
            let (row, col) = ((y / cell_px) as usize, (x / cell_px) as usize);
            palette[grid.cells()[row * grid.cols() + col]].rgb()
        },
    )
}

#[derive(Default, Debug)]
struct SixelBuf {
    align: usize,
    sixel: usize,
    count: usize,
    result: Option<String>,
}

impl SixelBuf {
    fn add(&mut self, sixel: usize, align: usize) {
        self.align = align;
        if self.count == 0 {
            self.sixel = sixel;
            self.count += 1;
        } else if sixel != self.sixel {
            self.upd_result();
            self.sixel = sixel;
            self.count = 1;
        } else {
            self.count += 1;
        }
    }

    fn upd_result(&mut self) {
        let c: u8 = (1 << (self.align % 6)) + 63;
        if self.count == 1 {
            self.result = Some(format!("#{}{}", self.sixel, c as char));
        } else {
            self.result = Some(format!("#{}!{}{}", self.sixel, self.count, c as char));
        }
    }

    fn flush(&mut self) {
        self.upd_result();
        self.count = 0;
    }

    fn take(&mut self) -> Option<String> {
        self.result.take()
    }
}

/// Sixel preview of the finished picture, one color register per palette
/// entry.
pub fn write_sixel<W: Write>(puzzle: &Puzzle, cell_px: usize, w: &mut W) -> Result<()> {
    let cell_px = cell_px.max(1);
    let grid = puzzle.grid();
    let width = grid.cols() * cell_px;
    let height = grid.rows() * cell_px;

    write!(w, "\x1bPq\"")?;
    write!(w, "1;1;{};{}", width, height)?;

    puzzle
        .palette()
        .iter()
        .enumerate()
        .try_for_each(|(i, entry)| {
            let r = entry.r as u16 * 100 / 255;
            let g = entry.g as u16 * 100 / 255;
            let b = entry.b as u16 * 100 / 255;
            write!(w, "#{};2;{};{};{}", i, r, g, b)
        })?;

    let mut sixel_buf = SixelBuf::default();
    for i in 0..height {
        let row = &grid.cells()[(i / cell_px) * grid.cols()..][..grid.cols()];
        for j in 0..width {
            sixel_buf.add(row[j / cell_px], i);
            if let Some(sixel) = sixel_buf.take() {
                write!(w, "{sixel}")?;
            }
        }
        sixel_buf.flush();
        if let Some(sixel) = sixel_buf.take() {
            write!(w, "{sixel}")?;
        }
        if i < height - 1 {
            if i % 6 == 5 {
                write!(w, "-")?;
            } else {
                write!(w, "$")?;
            }
        }
    }

    write!(w, "\x1b\\")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PuzzleConfig;
    use image::{DynamicImage, Rgb};

    /// 2x2: black, red / white, white.
    fn puzzle() -> Puzzle {
        let img = RgbImage::from_fn(2, 2, |x, y| match (x, y) {
            (0, 0) => Rgb::from([0, 0, 0]),
            (1, 0) => Rgb::from([255, 0, 0]),
            _ => Rgb::from([255, 255, 255]),
        });
        let config = PuzzleConfig {
            colors: 3,
            max_cols: 2,
        };
        Puzzle::from_image(&DynamicImage::ImageRgb8(img), &config).unwrap()
    }

    #[test]
    fn chart_lists_legend_then_numbers() {
        let mut out = Vec::new();
        write_chart(&puzzle(), &mut out).unwrap();
        let chart = String::from_utf8(out).unwrap();
        assert_eq!(chart, "1 #000000\n2 #ff0000\n3 #ffffff\n\n1 2\n3 3\n");
    }

    #[test]
    fn solution_scales_cells() {
        let img = solution_image(&puzzle(), 3);
        assert_eq!(img.dimensions(), (6, 6));
        assert_eq!(*img.get_pixel(2, 2), Rgb::from([0, 0, 0]));
        assert_eq!(*img.get_pixel(3, 0), Rgb::from([255, 0, 0]));
        assert_eq!(*img.get_pixel(5, 5), Rgb::from([255, 255, 255]));
        assert_eq!(solution_image(&puzzle(), 0).dimensions(), (2, 2));
    }

    #[test]
    fn sixel_stream() {
        let mut out = Vec::new();
        write_sixel(&puzzle(), 1, &mut out).unwrap();
        let sixel = String::from_utf8(out).unwrap();
        assert_eq!(
            sixel,
            "\x1bPq\"1;1;2;2#0;2;0;0;0#1;2;100;0;0#2;2;100;100;100\
             #0@#1@$#2!2A\x1b\\"
        );
    }

    #[test]
    fn sixel_runs_are_length_encoded() {
        let mut out = Vec::new();
        write_sixel(&puzzle(), 4, &mut out).unwrap();
        let sixel = String::from_utf8(out).unwrap();
        assert!(sixel.starts_with("\x1bPq\"1;1;8;8"));
        assert!(sixel.contains("#0!4@#1!4@$#0!4A#1!4A$"));
        // Sixth pixel row closes the band.
        assert!(sixel.contains("$#2!8_-#2!8@$"));
        assert!(sixel.ends_with("#2!8A\x1b\\"));
    }
}
