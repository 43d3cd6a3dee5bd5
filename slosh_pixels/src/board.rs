//! Physical board layout.
//!
//! The controller sees one long strip.  Each board covers a rectangle of
//! the logical grid; its cells go on the wire row by row, and the boards
//! go in the order they were added.  A board cell that falls outside the
//! grid gets the map's fallback color, so a misplaced board shows up as a
//! solid patch rather than garbage.

use crate::fullness::ColorGrid;
use crate::{Rgb, WHITE};

/// Side length of a FadeCandy 8×8 board.
pub const FADECANDY_SIDE: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    pub id:       usize,
    /// Grid column of the board's left edge.
    pub origin_x: usize,
    /// Grid row of the board's top edge.
    pub origin_y: usize,
    pub width:    usize,
    pub height:   usize,
}

impl Board {
    pub fn pixel_count(&self) -> usize { self.width * self.height }

    /// Append this board's pixels to `out`.
    pub fn map_into(&self, grid: &ColorGrid, fallback: Rgb, out: &mut Vec<Rgb>) {
        for row in 0..self.height {
            for col in 0..self.width {
                let c = grid
                    .get(self.origin_x + col, self.origin_y + row)
                    .unwrap_or(fallback);
                out.push(c);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoardMap {
    boards:   Vec<Board>,
    fallback: Rgb,
}

impl BoardMap {
    pub fn new(fallback: Rgb) -> Self {
        BoardMap { boards: Vec::new(), fallback }
    }

    /// Two FadeCandy boards side by side over a 16×8 grid.
    pub fn fadecandy_pair() -> Self {
        let mut m = BoardMap::new(WHITE);
        m.push(0, 0, FADECANDY_SIDE, FADECANDY_SIDE);
        m.push(FADECANDY_SIDE, 0, FADECANDY_SIDE, FADECANDY_SIDE);
        m
    }

    /// Add a board; ids are assigned in order from 0.
    pub fn push(&mut self, origin_x: usize, origin_y: usize, width: usize, height: usize) -> &Board {
        let id = self.boards.len();
        self.boards.push(Board { id, origin_x, origin_y, width, height });
        &self.boards[id]
    }

    pub fn boards(&self)   -> &[Board] { &self.boards }
    pub fn fallback(&self) -> Rgb      { self.fallback }

    pub fn pixel_count(&self) -> usize {
        self.boards.iter().map(Board::pixel_count).sum()
    }

    /// The full wire-order frame for `grid`.
    pub fn flatten(&self, grid: &ColorGrid) -> Vec<Rgb> {
        let mut out = Vec::with_capacity(self.pixel_count());
        for board in &self.boards {
            board.map_into(grid, self.fallback, &mut out);
        }
        out
    }
}

impl Default for BoardMap {
    fn default() -> Self { BoardMap::fadecandy_pair() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
