use crate::error::{Error, Result};
use crate::Puzzle;
use log::debug;

/// What happened when the player tapped a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillOutcome {
    /// No number picked yet.
    NoSelection,
    AlreadyFilled,
    Filled,
    /// Selected number does not match the cell; nothing changes.
    Wrong,
}

/// Player state for one puzzle. Loading another puzzle resets everything.
#[derive(Clone, Debug)]
pub struct GameSession {
    puzzle: Puzzle,
    selected: Option<usize>,
    filled: Vec<bool>,
    filled_count: usize,
}

impl GameSession {
    pub fn new(puzzle: Puzzle) -> Self {
        let filled = vec![false; puzzle.grid().len()];
        Self {
            puzzle,
            selected: None,
            filled,
            filled_count: 0,
        }
    }

    pub fn load(&mut self, puzzle: Puzzle) {
        *self = Self::new(puzzle);
    }

    #[inline]
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Picks palette `index` as the active number.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let len = self.puzzle.palette().len();
        if index >= len {
            return Err(Error::UnknownColor { index, len });
        }
        self.selected = Some(index);
        Ok(())
    }

    #[inline]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn cell(&self, row: usize, col: usize) -> Result<usize> {
        let grid = self.puzzle.grid();
        if row >= grid.rows() || col >= grid.cols() {
            return Err(Error::CellOutOfBounds {
                row,
                col,
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }
        Ok(row * grid.cols() + col)
    }

    pub fn fill(&mut self, row: usize, col: usize) -> Result<FillOutcome> {
        let cell = self.cell(row, col)?;
        let Some(selected) = self.selected else {
            return Ok(FillOutcome::NoSelection);
        };
        if self.filled[cell] {
            return Ok(FillOutcome::AlreadyFilled);
        }
        if self.puzzle.grid().cells()[cell] != selected {
            return Ok(FillOutcome::Wrong);
        }
        self.filled[cell] = true;
        self.filled_count += 1;
        if self.is_complete() {
            debug!("session: puzzle complete");
        }
        Ok(FillOutcome::Filled)
    }

    pub fn is_filled(&self, row: usize, col: usize) -> Result<bool> {
        let cell = self.cell(row, col)?;
        Ok(self.filled[cell])
    }

    #[inline]
    pub fn filled_count(&self) -> usize {
        self.filled_count
    }

    /// Unfilled cells still waiting for palette `index`.
    pub fn remaining(&self, index: usize) -> usize {
        self.puzzle
            .grid()
            .cells()
            .iter()
            .zip(&self.filled)
            .filter(|&(&c, &done)| c == index && !done)
            .count()
    }

    /// Filled share of the grid as a whole percentage.
    pub fn progress(&self) -> u8 {
        let total = self.filled.len();
        if total == 0 {
            return 100;
        }
        ((200 * self.filled_count + total) / (2 * total)) as u8
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.filled_count == self.filled.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PuzzleConfig;
    use image::{DynamicImage, Rgb, RgbImage};

    /// 3x1 puzzle: black, white, black.
    fn puzzle() -> Puzzle {
        let img = RgbImage::from_fn(3, 1, |x, _| {
            if x == 1 {
                Rgb::from([255, 255, 255])
            } else {
                Rgb::from([0, 0, 0])
            }
        });
        let config = PuzzleConfig {
            colors: 2,
            max_cols: 3,
        };
        Puzzle::from_image(&DynamicImage::ImageRgb8(img), &config).unwrap()
    }

    #[test]
    fn fill_needs_selection() {
        let mut session = GameSession::new(puzzle());
        assert_eq!(session.fill(0, 0).unwrap(), FillOutcome::NoSelection);
        assert_eq!(session.filled_count(), 0);
    }

    #[test]
    fn wrong_number_changes_nothing() {
        let mut session = GameSession::new(puzzle());
        session.select(1).unwrap();
        assert_eq!(session.fill(0, 0).unwrap(), FillOutcome::Wrong);
        assert!(!session.is_filled(0, 0).unwrap());
        assert_eq!(session.progress(), 0);
    }

    #[test]
    fn play_to_completion() {
        let mut session = GameSession::new(puzzle());
        assert_eq!(session.remaining(0), 2);
        session.select(0).unwrap();
        assert_eq!(session.fill(0, 0).unwrap(), FillOutcome::Filled);
        assert_eq!(session.fill(0, 0).unwrap(), FillOutcome::AlreadyFilled);
        assert_eq!(session.progress(), 33);
        assert_eq!(session.fill(0, 2).unwrap(), FillOutcome::Filled);
        assert_eq!(session.progress(), 67);
        assert_eq!(session.remaining(0), 0);
        assert!(!session.is_complete());

        session.select(1).unwrap();
        assert_eq!(session.fill(0, 1).unwrap(), FillOutcome::Filled);
        assert_eq!(session.progress(), 100);
        assert!(session.is_complete());
    }

    #[test]
    fn bad_input_is_rejected() {
        let mut session = GameSession::new(puzzle());
        assert!(matches!(
            session.select(2),
            Err(Error::UnknownColor { index: 2, len: 2 })
        ));
        assert_eq!(session.selected(), None);
        assert!(matches!(
            session.fill(1, 0),
            Err(Error::CellOutOfBounds { row: 1, .. })
        ));
    }

    #[test]
    fn load_resets_state() {
        let mut session = GameSession::new(puzzle());
        session.select(0).unwrap();
        session.fill(0, 0).unwrap();
        session.load(puzzle());
        assert_eq!(session.selected(), None);
        assert_eq!(session.filled_count(), 0);
        assert!(!session.is_filled(0, 0).unwrap());
    }
}
