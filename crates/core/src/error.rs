//! Error types for grid access and configuration handling
//!
//! Grid access failures are precondition violations raised by the caller
//! (reading outside the grid, or building a grid from mismatched data).
//! Configuration failures are user-facing: a rejected configuration never
//! produces a grid and leaves any running simulation untouched.

use std::fmt;
use std::path::PathBuf;

/// Which grid dimension a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Number of rows
    Height,
    /// Number of columns
    Width,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Height => write!(f, "height"),
            Dimension::Width => write!(f, "width"),
        }
    }
}

/// Errors raised when addressing or building a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A cell was addressed outside `[0, height) × [0, width)`
    OutOfRange {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
    /// Exactly one dimension is zero, or `height * width` overflows
    InvalidShape { height: usize, width: usize },
    /// A flat cell buffer does not hold `height * width` cells
    ShapeMismatch { expected: usize, actual: usize },
    /// A text row has a different number of cells than the first row
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A text token is not one of `T`, `F` or `A`
    InvalidSymbol(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfRange {
                row,
                col,
                height,
                width,
            } => write!(
                f,
                "Cell ({row}, {col}) is outside the {height}x{width} grid"
            ),
            GridError::InvalidShape { height, width } => {
                write!(f, "Cannot build a {height}x{width} grid")
            }
            GridError::ShapeMismatch { expected, actual } => {
                write!(f, "Expected {expected} cells, got {actual}")
            }
            GridError::RaggedRow {
                row,
                expected,
                actual,
            } => write!(f, "Row {row} has {actual} cells, expected {expected}"),
            GridError::InvalidSymbol(token) => write!(f, "Unknown cell symbol '{token}'"),
        }
    }
}

impl std::error::Error for GridError {}

/// Errors raised while validating a raw configuration
///
/// Validation stops at the first failure, so exactly one of these is
/// reported per rejected configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The dimension text is not an integer
    InvalidDimension { dimension: Dimension, input: String },
    /// The dimension is an integer outside the allowed range
    DimensionOutOfRange {
        dimension: Dimension,
        value: i64,
        min: usize,
        max: usize,
    },
    /// The spread probability text is not a real number
    InvalidProbability { input: String },
    /// The spread probability is outside `[0, 1]` (or NaN)
    ProbabilityOutOfRange { value: f64 },
    /// An ignition entry is not a `row,col` pair of integers
    InvalidIgnitionPoint { entry: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidDimension { dimension, input } => {
                write!(f, "Forest {dimension} must be an integer, got '{input}'")
            }
            ValidationError::DimensionOutOfRange {
                dimension,
                value,
                min,
                max,
            } => write!(
                f,
                "Forest {dimension} must be between {min} and {max}, got {value}"
            ),
            ValidationError::InvalidProbability { input } => {
                write!(f, "Spread probability must be a number, got '{input}'")
            }
            ValidationError::ProbabilityOutOfRange { value } => {
                write!(f, "Spread probability must be between 0 and 1, got {value}")
            }
            ValidationError::InvalidIgnitionPoint { entry } => write!(
                f,
                "Invalid ignition point '{entry}', expected format row1,col1;row2,col2;..."
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a configuration file
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid TOML for a raw configuration
    Parse(toml::de::Error),
    /// The file parsed but its values were rejected
    Invalid(ValidationError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "Failed to parse config: {err}"),
            ConfigError::Invalid(err) => write!(f, "Invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Invalid(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_out_of_range_message() {
        let err = GridError::OutOfRange {
            row: 7,
            col: 2,
            height: 5,
            width: 5,
        };
        assert_eq!(err.to_string(), "Cell (7, 2) is outside the 5x5 grid");
    }

    #[test]
    fn test_config_error_chains_validation_source() {
        let err = ConfigError::from(ValidationError::ProbabilityOutOfRange { value: 1.5 });
        let source = err.source().expect("validation error should be the source");
        assert!(source.to_string().contains("between 0 and 1"));
    }
}
