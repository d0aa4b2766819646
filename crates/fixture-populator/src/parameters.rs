//! Population parameters.
//!
//! `Parameters` is the immutable set of knobs a `Populator` is built with.
//! Every field has a default, so partial YAML documents are accepted:
//!
//! ```yaml
//! seed: 42
//! min_collection_size: 2
//! max_collection_size: 2
//! charset: alphanumeric
//! date_range:
//!   min: 2020-01-01
//!   max: 2024-12-31
//! ```

use crate::error::FixtureError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Default minimum number of elements in generated containers.
pub const DEFAULT_MIN_COLLECTION_SIZE: usize = 1;
/// Default maximum number of elements in generated containers.
pub const DEFAULT_MAX_COLLECTION_SIZE: usize = 5;
/// Default minimum length of generated strings.
pub const DEFAULT_MIN_STRING_LENGTH: usize = 1;
/// Default maximum length of generated strings.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 128;
/// Default number of distinct instances generated per type before reuse.
pub const DEFAULT_MAX_OBJECT_POOL_SIZE: usize = 10;
/// Default nesting level beyond which fields are left untouched.
pub const DEFAULT_MAX_RANDOMIZATION_DEPTH: usize = 20;

/// Characters used to generate strings and chars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    /// ASCII letters
    #[default]
    Alphabetic,
    /// ASCII letters and digits
    Alphanumeric,
    /// Printable ASCII, space included
    Ascii,
    /// An explicit alphabet
    Custom(String),
}

impl Charset {
    /// The characters of this charset, in a stable order.
    pub fn characters(&self) -> Vec<char> {
        match self {
            Self::Alphabetic => ('a'..='z').chain('A'..='Z').collect(),
            Self::Alphanumeric => ('a'..='z').chain('A'..='Z').chain('0'..='9').collect(),
            Self::Ascii => (' '..='~').collect(),
            Self::Custom(chars) => {
                let mut seen = Vec::new();
                for c in chars.chars() {
                    if !seen.contains(&c) {
                        seen.push(c);
                    }
                }
                seen
            }
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateRange {
    pub fn new(min: NaiveDate, max: NaiveDate) -> Self {
        Self { min, max }
    }
}

impl Default for DateRange {
    /// A fixed window around the present, so unconfigured runs stay reproducible.
    fn default() -> Self {
        Self {
            min: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN),
            max: NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX),
        }
    }
}

/// Inclusive range of times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: NaiveTime,
    pub max: NaiveTime,
}

impl TimeRange {
    pub fn new(min: NaiveTime, max: NaiveTime) -> Self {
        Self { min, max }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            min: NaiveTime::MIN,
            max: NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Parameters controlling how values are generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Seed of the random source; a time-based seed is chosen when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Minimum number of elements in generated containers
    pub min_collection_size: usize,

    /// Maximum number of elements in generated containers
    pub max_collection_size: usize,

    /// Minimum length of generated strings
    pub min_string_length: usize,

    /// Maximum length of generated strings
    pub max_string_length: usize,

    /// Number of distinct instances generated per type before instances are reused
    pub max_object_pool_size: usize,

    /// Nesting level beyond which fields are left untouched
    pub max_randomization_depth: usize,

    /// Characters used for strings and chars
    pub charset: Charset,

    /// Range of generated dates (and of the date part of timestamps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,

    /// Range of generated times (and of the time part of timestamps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,

    /// Pick a concrete subtype for abstract and interface fields
    pub scan_for_concrete_types: bool,

    /// Overwrite fields that already hold a non-default value after construction
    pub override_default_initialization: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            seed: None,
            min_collection_size: DEFAULT_MIN_COLLECTION_SIZE,
            max_collection_size: DEFAULT_MAX_COLLECTION_SIZE,
            min_string_length: DEFAULT_MIN_STRING_LENGTH,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            max_object_pool_size: DEFAULT_MAX_OBJECT_POOL_SIZE,
            max_randomization_depth: DEFAULT_MAX_RANDOMIZATION_DEPTH,
            charset: Charset::default(),
            date_range: None,
            time_range: None,
            scan_for_concrete_types: false,
            override_default_initialization: false,
        }
    }
}

impl Parameters {
    /// Date range in effect.
    pub fn effective_date_range(&self) -> DateRange {
        self.date_range.unwrap_or_default()
    }

    /// Time range in effect.
    pub fn effective_time_range(&self) -> TimeRange {
        self.time_range.unwrap_or_default()
    }

    /// Check every range and limit.
    pub fn validate(&self) -> Result<(), FixtureError> {
        if self.min_collection_size > self.max_collection_size {
            return Err(FixtureError::Configuration(format!(
                "min_collection_size ({}) must be less than or equal to max_collection_size ({})",
                self.min_collection_size, self.max_collection_size
            )));
        }
        if self.min_string_length > self.max_string_length {
            return Err(FixtureError::Configuration(format!(
                "min_string_length ({}) must be less than or equal to max_string_length ({})",
                self.min_string_length, self.max_string_length
            )));
        }
        if let Some(range) = &self.date_range {
            if range.min > range.max {
                return Err(FixtureError::Configuration(format!(
                    "date_range min ({}) must not be after max ({})",
                    range.min, range.max
                )));
            }
        }
        if let Some(range) = &self.time_range {
            if range.min > range.max {
                return Err(FixtureError::Configuration(format!(
                    "time_range min ({}) must not be after max ({})",
                    range.min, range.max
                )));
            }
        }
        if self.charset.characters().is_empty() {
            return Err(FixtureError::Configuration(
                "custom charset must contain at least one character".to_string(),
            ));
        }
        Ok(())
    }
}
