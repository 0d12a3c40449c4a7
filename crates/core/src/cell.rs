//! Cell states of the forest grid
//!
//! A cell moves one way only: `Tree → Fire → Ash`, and ash stays ash.

use serde::Serialize;
use std::fmt;

/// State of a single grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Cell {
    /// Unburned tree that can catch fire
    #[default]
    Tree,
    /// Burning tree; becomes ash on the next step
    Fire,
    /// Burned out, terminal
    Ash,
}

impl Cell {
    /// Single-character symbol used in text renderings (`T`, `F`, `A`)
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Cell::Tree => 'T',
            Cell::Fire => 'F',
            Cell::Ash => 'A',
        }
    }

    /// Inverse of [`Cell::symbol`]
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'T' => Some(Cell::Tree),
            'F' => Some(Cell::Fire),
            'A' => Some(Cell::Ash),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_burning(self) -> bool {
        matches!(self, Cell::Fire)
    }

    /// The state this cell decays to when nothing ignites it
    #[must_use]
    pub const fn decayed(self) -> Self {
        match self {
            Cell::Tree => Cell::Tree,
            Cell::Fire | Cell::Ash => Cell::Ash,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
