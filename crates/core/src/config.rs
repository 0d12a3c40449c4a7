//! Simulation configuration: raw user input and its validated form
//!
//! A [`RawConfig`] holds the four values exactly as a user typed them.
//! [`parse`] turns it into a [`Configuration`], checking fields in a fixed
//! order and stopping at the first failure:
//!
//! 1. height, then width: integers in `[MIN_DIMENSION, MAX_DIMENSION]`
//! 2. spread probability: a real number in `[0, 1]`
//! 3. ignition points: `row,col` pairs separated by `;`
//!
//! Ignition points are not checked against the grid here. Points outside the
//! grid are dropped when the grid is created.

use crate::error::{ConfigError, Dimension, ValidationError};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Smallest allowed grid height/width
pub const MIN_DIMENSION: usize = 5;
/// Largest allowed grid height/width
pub const MAX_DIMENSION: usize = 100;

pub const DEFAULT_HEIGHT: usize = 10;
pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_SPREAD_PROBABILITY: f64 = 0.5;
pub const DEFAULT_IGNITION_POINTS: &str = "0,0;5,5";

/// A grid coordinate seeded as burning at initialization
///
/// Signed, because user input may name points outside any grid; those are
/// kept here and skipped when seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IgnitionPoint {
    pub row: i64,
    pub col: i64,
}

impl IgnitionPoint {
    #[must_use]
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

impl From<(i64, i64)> for IgnitionPoint {
    fn from((row, col): (i64, i64)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for IgnitionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Validated simulation configuration
///
/// Dimensions and probability are always within bounds; construct through
/// [`Configuration::new`] or [`parse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    height: usize,
    width: usize,
    spread_probability: f64,
    ignition_points: Vec<IgnitionPoint>,
}

impl Configuration {
    /// Create a configuration from already-typed values
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking height, width and
    /// probability in that order.
    pub fn new(
        height: usize,
        width: usize,
        spread_probability: f64,
        ignition_points: Vec<IgnitionPoint>,
    ) -> Result<Self, ValidationError> {
        let height = check_dimension(Dimension::Height, height as i64)?;
        let width = check_dimension(Dimension::Width, width as i64)?;
        let spread_probability = check_probability(spread_probability)?;
        Ok(Self {
            height,
            width,
            spread_probability,
            ignition_points,
        })
    }

    /// Load and validate a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`] if the file cannot
    /// be read, and [`ConfigError::Invalid`] if its values are rejected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = RawConfig::load(path)?;
        Ok(parse(&raw)?)
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn spread_probability(&self) -> f64 {
        self.spread_probability
    }

    #[must_use]
    pub fn ignition_points(&self) -> &[IgnitionPoint] {
        &self.ignition_points
    }

    /// Express this configuration as the raw strings a user would type
    #[must_use]
    pub fn to_raw(&self) -> RawConfig {
        RawConfig {
            height: self.height.to_string(),
            width: self.width.to_string(),
            spread_probability: self.spread_probability.to_string(),
            ignition_points: format_ignition_points(&self.ignition_points),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            spread_probability: DEFAULT_SPREAD_PROBABILITY,
            ignition_points: vec![IgnitionPoint::new(0, 0), IgnitionPoint::new(5, 5)],
        }
    }
}

/// Unvalidated configuration as entered by a user or read from a file
///
/// In TOML, numeric fields may be written as numbers or strings, and
/// `ignition_points` as either `"r,c;r,c"` or an array of `[row, col]` pairs.
/// Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    #[serde(deserialize_with = "scalar_as_string")]
    pub height: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub width: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub spread_probability: String,
    #[serde(deserialize_with = "ignition_as_string")]
    pub ignition_points: String,
}

impl RawConfig {
    pub fn new(
        height: impl Into<String>,
        width: impl Into<String>,
        spread_probability: impl Into<String>,
        ignition_points: impl Into<String>,
    ) -> Self {
        Self {
            height: height.into(),
            width: width.into(),
            spread_probability: spread_probability.into(),
            ignition_points: ignition_points.into(),
        }
    }

    /// Parse a raw configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML or a field
    /// has an unsupported type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a raw configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid raw configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = Self::from_toml_str(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(raw)
    }

    /// Shorthand for [`parse`]
    ///
    /// # Errors
    ///
    /// See [`parse`].
    pub fn validate(&self) -> Result<Configuration, ValidationError> {
        parse(self)
    }
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT.to_string(),
            width: DEFAULT_WIDTH.to_string(),
            spread_probability: DEFAULT_SPREAD_PROBABILITY.to_string(),
            ignition_points: DEFAULT_IGNITION_POINTS.to_string(),
        }
    }
}

/// Validate a raw configuration
///
/// All-or-nothing: on failure no field of the result exists, so a caller
/// holding a previous configuration keeps it unchanged.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered, in the order height,
/// width, spread probability, ignition points.
pub fn parse(raw: &RawConfig) -> Result<Configuration, ValidationError> {
    let height = parse_dimension(Dimension::Height, &raw.height)?;
    let width = parse_dimension(Dimension::Width, &raw.width)?;
    let spread_probability = parse_probability(&raw.spread_probability)?;
    let ignition_points = parse_ignition_points(&raw.ignition_points)?;

    Ok(Configuration {
        height,
        width,
        spread_probability,
        ignition_points,
    })
}

/// Parse `"row1,col1;row2,col2;..."` into ignition points
///
/// Entries are trimmed and empty entries are skipped, so `" 0,0 ; ;1, 2;"`
/// is two points. Every remaining entry must be exactly two integers.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidIgnitionPoint`] for the first entry that
/// is not a pair of integers; no partial list is returned.
pub fn parse_ignition_points(text: &str) -> Result<Vec<IgnitionPoint>, ValidationError> {
    text.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_ignition_point)
        .collect()
}

fn parse_ignition_point(entry: &str) -> Result<IgnitionPoint, ValidationError> {
    let invalid = || ValidationError::InvalidIgnitionPoint {
        entry: entry.to_string(),
    };

    let mut parts = entry.split(',').map(str::trim);
    let row = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let col = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(IgnitionPoint { row, col })
}

/// Inverse of [`parse_ignition_points`]
#[must_use]
pub fn format_ignition_points(points: &[IgnitionPoint]) -> String {
    points
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

fn parse_dimension(dimension: Dimension, text: &str) -> Result<usize, ValidationError> {
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidDimension {
            dimension,
            input: text.to_string(),
        })?;
    check_dimension(dimension, value)
}

fn check_dimension(dimension: Dimension, value: i64) -> Result<usize, ValidationError> {
    match usize::try_from(value) {
        Ok(size) if (MIN_DIMENSION..=MAX_DIMENSION).contains(&size) => Ok(size),
        _ => Err(ValidationError::DimensionOutOfRange {
            dimension,
            value,
            min: MIN_DIMENSION,
            max: MAX_DIMENSION,
        }),
    }
}

fn parse_probability(text: &str) -> Result<f64, ValidationError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidProbability {
            input: text.to_string(),
        })?;
    check_probability(value)
}

fn check_probability(value: f64) -> Result<f64, ValidationError> {
    // NaN fails the range check
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::ProbabilityOutOfRange { value })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Int(v) => v.to_string(),
        // Debug keeps the fractional part, so `20.0` stays a non-integer dimension
        Scalar::Float(v) => format!("{v:?}"),
        Scalar::Text(s) => s,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IgnitionField {
    Text(String),
    Pairs(Vec<[i64; 2]>),
}

fn ignition_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IgnitionField::deserialize(deserializer)? {
        IgnitionField::Text(s) => s,
        IgnitionField::Pairs(pairs) => {
            let points: Vec<IgnitionPoint> = pairs
                .into_iter()
                .map(|[row, col]| IgnitionPoint { row, col })
                .collect();
            format_ignition_points(&points)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(height: &str, width: &str, p: &str, points: &str) -> RawConfig {
        RawConfig::new(height, width, p, points)
    }

    #[test]
    fn test_parse_valid_config() {
        let config = parse(&raw("10", "20", "0.35", "0,0;5,5")).unwrap();
        assert_eq!(config.height(), 10);
        assert_eq!(config.width(), 20);
        assert_eq!(config.spread_probability(), 0.35);
        assert_eq!(
            config.ignition_points(),
            &[IgnitionPoint::new(0, 0), IgnitionPoint::new(5, 5)]
        );
    }

    #[test]
    fn test_dimension_bounds_are_inclusive() {
        assert!(parse(&raw("5", "100", "0.5", "")).is_ok());
        assert!(matches!(
            parse(&raw("4", "10", "0.5", "")),
            Err(ValidationError::DimensionOutOfRange {
                dimension: Dimension::Height,
                value: 4,
                ..
            })
        ));
        assert!(matches!(
            parse(&raw("10", "101", "0.5", "")),
            Err(ValidationError::DimensionOutOfRange {
                dimension: Dimension::Width,
                value: 101,
                ..
            })
        ));
        assert!(matches!(
            parse(&raw("-7", "10", "0.5", "")),
            Err(ValidationError::DimensionOutOfRange { value: -7, .. })
        ));
    }

    #[test]
    fn test_non_integer_dimension() {
        assert_eq!(
            parse(&raw("ten", "10", "0.5", "")),
            Err(ValidationError::InvalidDimension {
                dimension: Dimension::Height,
                input: "ten".to_string()
            })
        );
        assert!(matches!(
            parse(&raw("10", "10.5", "0.5", "")),
            Err(ValidationError::InvalidDimension {
                dimension: Dimension::Width,
                ..
            })
        ));
    }

    #[test]
    fn test_probability_out_of_range() {
        assert_eq!(
            parse(&raw("10", "10", "1.5", "0,0")),
            Err(ValidationError::ProbabilityOutOfRange { value: 1.5 })
        );
        assert!(parse(&raw("10", "10", "-0.1", "0,0")).is_err());
        assert!(parse(&raw("10", "10", "NaN", "0,0")).is_err());
        assert!(matches!(
            parse(&raw("10", "10", "half", "0,0")),
            Err(ValidationError::InvalidProbability { .. })
        ));
        assert!(parse(&raw("10", "10", "0", "0,0")).is_ok());
        assert!(parse(&raw("10", "10", "1", "0,0")).is_ok());
    }

    #[test]
    fn test_first_violation_wins() {
        // Height is checked before probability and ignition points
        assert!(matches!(
            parse(&raw("3", "10", "2.0", "bad")),
            Err(ValidationError::DimensionOutOfRange {
                dimension: Dimension::Height,
                ..
            })
        ));
        assert!(matches!(
            parse(&raw("10", "10", "2.0", "bad")),
            Err(ValidationError::ProbabilityOutOfRange { .. })
        ));
    }

    #[test]
    fn test_ignition_points_parsing() {
        assert_eq!(
            parse_ignition_points("0,0;5,5").unwrap(),
            vec![IgnitionPoint::new(0, 0), IgnitionPoint::new(5, 5)]
        );
        assert_eq!(
            parse_ignition_points("  3 , 4 ;; ; -1,200 ;").unwrap(),
            vec![IgnitionPoint::new(3, 4), IgnitionPoint::new(-1, 200)]
        );
        assert!(parse_ignition_points("").unwrap().is_empty());
    }

    #[test]
    fn test_ignition_points_reject_whole_input() {
        assert_eq!(
            parse_ignition_points("0,0;bad"),
            Err(ValidationError::InvalidIgnitionPoint {
                entry: "bad".to_string()
            })
        );
        assert!(parse_ignition_points("1").is_err());
        assert!(parse_ignition_points("1,").is_err());
        assert!(parse_ignition_points("1,2,3").is_err());
        assert!(parse_ignition_points("1.5,2").is_err());
    }

    #[test]
    fn test_out_of_grid_points_are_kept() {
        let config = parse(&raw("5", "5", "0.5", "10,10")).unwrap();
        assert_eq!(config.ignition_points(), &[IgnitionPoint::new(10, 10)]);
    }

    #[test]
    fn test_new_rejects_out_of_range_values() {
        assert!(Configuration::new(10, 10, 0.5, Vec::new()).is_ok());
        assert!(Configuration::new(2, 10, 0.5, Vec::new()).is_err());
        assert!(Configuration::new(10, 10, 1.01, Vec::new()).is_err());
    }

    #[test]
    fn test_to_raw_round_trip() {
        let config = parse(&raw("12", "34", "0.125", "1,2;-3,4")).unwrap();
        assert_eq!(config.to_raw(), raw("12", "34", "0.125", "1,2;-3,4"));
        assert_eq!(parse(&config.to_raw()).unwrap(), config);
    }

    #[test]
    fn test_defaults_validate() {
        assert_eq!(RawConfig::default().validate().unwrap(), Configuration::default());
    }

    #[test]
    fn test_toml_accepts_numbers_strings_and_pairs() {
        let from_numbers = RawConfig::from_toml_str(
            "height = 20\nwidth = 30\nspread_probability = 0.25\nignition_points = [[1, 2], [3, 4]]\n",
        )
        .unwrap();
        assert_eq!(from_numbers, raw("20", "30", "0.25", "1,2;3,4"));

        let from_strings =
            RawConfig::from_toml_str("height = \"20\"\nignition_points = \"1,2\"\n").unwrap();
        assert_eq!(from_strings.height, "20");
        assert_eq!(from_strings.width, DEFAULT_WIDTH.to_string());
        assert_eq!(from_strings.ignition_points, "1,2");
    }

    #[test]
    fn test_toml_float_dimensions_are_rejected_like_text() {
        let raw = RawConfig::from_toml_str("height = 20.0\nwidth = 1e1\n").unwrap();
        assert_eq!(raw.height, "20.0");
        assert_eq!(raw.width, "10.0");
        assert_eq!(
            raw.validate(),
            Err(ValidationError::InvalidDimension {
                dimension: Dimension::Height,
                input: "20.0".to_string()
            })
        );

        let raw = RawConfig::from_toml_str("spread_probability = 1e-1\n").unwrap();
        assert_eq!(raw.validate().unwrap().spread_probability(), 0.1);
    }

    #[test]
    fn test_toml_type_errors_are_parse_errors() {
        let err = RawConfig::from_toml_str("height = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "forest-fire-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "height = 12\nwidth = \"15\"\nspread_probability = 0.75\nignition_points = [[2, 3]]\n",
        )
        .unwrap();

        let loaded = Configuration::load(&path);
        std::fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.height(), 12);
        assert_eq!(config.width(), 15);
        assert_eq!(config.spread_probability(), 0.75);
        assert_eq!(config.ignition_points(), &[IgnitionPoint::new(2, 3)]);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let path = std::env::temp_dir().join(format!(
            "forest-fire-invalid-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "spread_probability = 1.5\n").unwrap();

        let loaded = Configuration::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            loaded,
            Err(ConfigError::Invalid(ValidationError::ProbabilityOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Configuration::load("/nonexistent/forest.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
