//! Forest grid model
//!
//! The grid is a fixed `height × width` array of [`Cell`] stored flat in
//! row-major order (`row * width + col`). Its dimensions never change; a new
//! configuration builds a new grid.

use crate::cell::Cell;
use crate::config::{Configuration, IgnitionPoint};
use crate::error::GridError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Per-state cell totals for a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellCounts {
    pub trees: usize,
    pub fires: usize,
    pub ashes: usize,
}

impl CellCounts {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.trees + self.fires + self.ashes
    }

    /// Cells that have caught fire at some point (burning or burned out)
    #[must_use]
    pub const fn burned(&self) -> usize {
        self.fires + self.ashes
    }
}

/// Two-dimensional forest of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    height: usize,
    width: usize,
    /// Cell states in row-major order
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid where every cell is a [`Cell::Tree`]
    ///
    /// # Arguments
    ///
    /// * `height` - Number of rows
    /// * `width` - Number of columns
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![Cell::Tree; height * width],
        }
    }

    /// Build the initial grid for a configuration
    ///
    /// Every cell starts as a tree, then each ignition point that lies inside
    /// the grid is set on fire. Points outside the grid are skipped without
    /// error, so a point list written for a larger forest still applies to a
    /// smaller one.
    #[must_use]
    pub fn create(config: &Configuration) -> Self {
        let mut grid = Self::new(config.height(), config.width());
        let seeded = grid.ignite(config.ignition_points());
        let skipped = config.ignition_points().len() - seeded;
        if skipped > 0 {
            debug!(
                "Skipped {} ignition point(s) outside the {}x{} grid",
                skipped, grid.height, grid.width
            );
        }
        grid
    }

    /// Build a grid from a flat row-major cell buffer
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidShape`] if exactly one dimension is zero or
    /// `height * width` overflows, and [`GridError::ShapeMismatch`] if
    /// `cells.len() != height * width`.
    pub fn from_cells(height: usize, width: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        let expected = height
            .checked_mul(width)
            .filter(|_| (height == 0) == (width == 0))
            .ok_or(GridError::InvalidShape { height, width })?;
        if cells.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Set every in-bounds ignition point on fire
    ///
    /// # Returns
    ///
    /// Number of points that fell inside the grid
    pub fn ignite(&mut self, points: &[IgnitionPoint]) -> usize {
        let mut seeded = 0;
        for point in points {
            if let Some((row, col)) = self.locate(point.row, point.col) {
                let index = self.index(row, col);
                self.cells[index] = Cell::Fire;
                seeded += 1;
            }
        }
        seeded
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// All cells in row-major order
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over the grid one row at a time
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks_exact panics on a zero chunk size
        self.cells.chunks_exact(self.width.max(1))
    }

    /// Bounds-checked read of a single cell
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfRange`] if `row >= height` or `col >= width`.
    pub fn cell_at(&self, row: usize, col: usize) -> Result<Cell, GridError> {
        self.get(row, col).ok_or(GridError::OutOfRange {
            row,
            col,
            height: self.height,
            width: self.width,
        })
    }

    /// Read a single cell, `None` when out of bounds
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.height && col < self.width {
            Some(self.cells[self.index(row, col)])
        } else {
            None
        }
    }

    /// True if at least one cell is burning
    #[must_use]
    pub fn has_fire(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_burning())
    }

    #[must_use]
    pub fn counts(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for cell in &self.cells {
            match cell {
                Cell::Tree => counts.trees += 1,
                Cell::Fire => counts.fires += 1,
                Cell::Ash => counts.ashes += 1,
            }
        }
        counts
    }

    /// Fraction of cells that are burning or burned out (0.0 - 1.0)
    #[must_use]
    pub fn burned_fraction(&self) -> f32 {
        let counts = self.counts();
        if counts.total() == 0 {
            return 0.0;
        }
        counts.burned() as f32 / counts.total() as f32
    }

    /// Convert signed coordinates into an in-bounds `(row, col)`
    #[must_use]
    pub fn locate(&self, row: i64, col: i64) -> Option<(usize, usize)> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.height && col < self.width).then_some((row, col))
    }

    /// In-bounds neighbour of `(row, col)` shifted by `(d_row, d_col)`
    #[inline]
    pub(crate) fn offset(
        &self,
        row: usize,
        col: usize,
        d_row: isize,
        d_col: isize,
    ) -> Option<(usize, usize)> {
        let row = row.checked_add_signed(d_row)?;
        let col = col.checked_add_signed(d_col)?;
        (row < self.height && col < self.width).then_some((row, col))
    }

    #[inline]
    pub(crate) const fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let index = self.index(row, col);
        self.cells[index] = cell;
    }
}

/// Renders one row per line, cells as `T`/`F`/`A` separated by spaces
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let mut first = true;
            for cell in row {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{cell}")?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) format back into a grid
///
/// Blank lines are ignored. Cells may be separated by whitespace or written
/// contiguously (`"TTF"` and `"T T F"` are the same row).
impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0;

        for line in s.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let mut row_len = 0;
            for symbol in line.chars().filter(|c| !c.is_whitespace()) {
                let cell = Cell::from_symbol(symbol)
                    .ok_or_else(|| GridError::InvalidSymbol(symbol.to_string()))?;
                cells.push(cell);
                row_len += 1;
            }

            match width {
                None => width = Some(row_len),
                Some(expected) if expected != row_len => {
                    return Err(GridError::RaggedRow {
                        row: height,
                        expected,
                        actual: row_len,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }

        Self::from_cells(height, width.unwrap_or(0), cells)
    }
}
