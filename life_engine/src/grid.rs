// grid.rs - Toroidal grid for Conway's Game of Life

use std::fmt;

use rand::Rng;
use tracing::{debug, info, trace};

use crate::error::LifeError;
use crate::patterns::Pattern;

/// Share of cells brought to life by `randomize`.
pub const FILL_RATIO: f64 = 0.2;

/// Fixed-size grid of binary cells whose edges wrap around in both
/// directions. Cells are stored row-major, one byte per cell (0 or 1).
///
/// `scratch` is the second half of the double buffer: `step` writes the
/// next generation there and swaps it in, so no reader ever sees a
/// half-updated generation.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
    scratch: Vec<u8>,
    generation: u64,
}

impl Grid {
    /// Creates an all-dead `rows x cols` grid. Zero dimensions, or a cell
    /// count that does not fit in `usize`, are `InvalidDimensions`.
    pub fn new(rows: usize, cols: usize) -> Result<Self, LifeError> {
        if rows == 0 || cols == 0 {
            return Err(LifeError::InvalidDimensions { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(LifeError::InvalidDimensions { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![0; len],
            scratch: vec![0; len],
            generation: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of `step` calls since construction or the last reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Read accessor for renderers.
    pub fn is_alive(&self, row: usize, col: usize) -> Result<bool, LifeError> {
        self.check_bounds(row, col)?;
        Ok(self.cells[self.index(row, col)] == 1)
    }

    /// Live cells as `(row, col)`, in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == 1)
            .map(|(idx, _)| (idx / self.cols, idx % self.cols))
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == 1).count()
    }

    /// Live cells among the 8 surrounding `(row, col)`. Both coordinates
    /// are wrapped first, so every input is valid.
    pub fn count_neighbors(&self, row: usize, col: usize) -> u8 {
        count_neighbors_in(&self.cells, self.rows, self.cols, row, col)
    }

    /// Advances one generation.
    pub fn step(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = row * self.cols + col;
                let count = count_neighbors_in(&self.cells, self.rows, self.cols, row, col);
                self.scratch[idx] = next_state(self.cells[idx], count);
            }
        }
        self.finish_step();
    }

    /// Flips one cell. Out-of-range coordinates are rejected untouched.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> Result<(), LifeError> {
        self.check_bounds(row, col)?;
        let idx = self.index(row, col);
        self.cells[idx] ^= 1;
        Ok(())
    }

    /// Clears the grid, then brings exactly `floor(rows * cols * FILL_RATIO)`
    /// distinct cells to life.
    pub fn randomize(&mut self) {
        self.randomize_with(&mut rand::thread_rng());
    }

    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let total = self.rows * self.cols;
        let target = (total as f64 * FILL_RATIO) as usize;

        self.reset();
        for idx in rand::seq::index::sample(rng, total, target) {
            self.cells[idx] = 1;
        }
        info!(rows = self.rows, cols = self.cols, live = target, "grid randomized");
    }

    pub fn clear(&mut self) {
        self.reset();
        info!(rows = self.rows, cols = self.cols, "grid cleared");
    }

    /// Brings a pattern's cells to life with its top-left corner at
    /// `(row, col)`. Offsets wrap like everything else; existing cells are
    /// left as they are.
    pub fn stamp(&mut self, pattern: &Pattern, row: usize, col: usize) {
        let (row, col) = (row % self.rows, col % self.cols);
        for &(dr, dc) in pattern.cells {
            let r = (row + dr) % self.rows;
            let c = (col + dc) % self.cols;
            let idx = self.index(r, c);
            self.cells[idx] = 1;
        }
        debug!(pattern = pattern.name, row, col, "pattern stamped");
    }

    pub(crate) fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub(crate) fn scratch_mut(&mut self) -> &mut [u8] {
        &mut self.scratch
    }

    /// Swaps the freshly computed generation in.
    pub(crate) fn finish_step(&mut self) {
        std::mem::swap(&mut self.cells, &mut self.scratch);
        self.generation += 1;
        debug!(generation = self.generation, population = self.population(), "step");
        trace!("\n{self}");
    }

    fn reset(&mut self) {
        self.cells.fill(0);
        self.generation = 0;
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), LifeError> {
        if row >= self.rows || col >= self.cols {
            return Err(LifeError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

/// Two grids are equal when they hold the same cells; the generation
/// counter and scratch buffer are bookkeeping.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            for &cell in row {
                f.write_str(if cell == 1 { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Neighbour count against an arbitrary row-major buffer, so the concurrent
/// step can read from its shared snapshot.
pub(crate) fn count_neighbors_in(cells: &[u8], rows: usize, cols: usize, row: usize, col: usize) -> u8 {
    let (row, col) = (row % rows, col % cols);
    // rows - 1 is the wrapped -1
    let row_offsets = [rows - 1, 0, 1];
    let col_offsets = [cols - 1, 0, 1];

    let mut count = 0;
    for (i, &dr) in row_offsets.iter().enumerate() {
        for (j, &dc) in col_offsets.iter().enumerate() {
            if i == 1 && j == 1 {
                continue;
            }
            let r = (row + dr) % rows;
            let c = (col + dc) % cols;
            count += cells[r * cols + c];
        }
    }
    count
}

pub(crate) fn next_state(cell: u8, count: u8) -> u8 {
    match (cell, count) {
        (1, 2) | (1, 3) => 1, // Survival
        (0, 3)          => 1, // Birth
        _               => 0, // Death or stays dead
    }
}
