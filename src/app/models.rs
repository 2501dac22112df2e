//! Core data models for Argo profile quality control
//!
//! This module defines the profile record handed to the QC engine, the
//! tracked variables, the Argo QC flag taxonomy and the profile-level data
//! quality grades.

pub mod report;

use crate::constants::{ARGO_FILL_VALUE, PRESSURE_ORDER_TOLERANCE, quality_cutoffs, variables};
use crate::error::{QcError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub use report::QcReport;

/// Variables tracked by the QC engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variable {
    #[serde(rename = "TEMP")]
    Temperature,
    #[serde(rename = "PSAL")]
    Salinity,
    #[serde(rename = "PRES")]
    Pressure,
}

impl Variable {
    /// Argo parameter code for this variable
    pub fn code(self) -> &'static str {
        match self {
            Variable::Temperature => variables::TEMP,
            Variable::Salinity => variables::PSAL,
            Variable::Pressure => variables::PRES,
        }
    }

    /// Measurement variables that receive per-point flags
    ///
    /// Pressure is the vertical coordinate: its limits are applied per level
    /// to the measurements taken there rather than flagged on their own.
    pub fn measured() -> [Variable; 2] {
        [Variable::Temperature, Variable::Salinity]
    }

    /// All tracked variables
    pub fn all() -> [Variable; 3] {
        [Variable::Temperature, Variable::Salinity, Variable::Pressure]
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Variable {
    type Err = QcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            variables::TEMP => Ok(Variable::Temperature),
            variables::PSAL => Ok(Variable::Salinity),
            variables::PRES => Ok(Variable::Pressure),
            _ => Err(QcError::unknown_variable(s)),
        }
    }
}

/// Argo quality control flag assigned to a single measurement
///
/// Flags are totally ordered by severity so that merging the verdicts of
/// several detectors is a plain `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QcFlag {
    /// No QC performed
    NoQc,
    /// Good data
    Good,
    /// Probably good data
    ProbablyGood,
    /// Probably bad data, potentially correctable
    ProbablyBad,
    /// Bad data
    Bad,
    /// Value changed
    Changed,
    /// Not used
    NotUsed,
    /// Not used (alternate reserved code)
    NotUsedAlt,
    /// Estimated value
    Estimated,
    /// Missing value
    Missing,
}

impl QcFlag {
    /// Argo reference table 2 code
    pub fn code(self) -> char {
        match self {
            QcFlag::NoQc => '0',
            QcFlag::Good => '1',
            QcFlag::ProbablyGood => '2',
            QcFlag::ProbablyBad => '3',
            QcFlag::Bad => '4',
            QcFlag::Changed => '5',
            QcFlag::NotUsed => '6',
            QcFlag::NotUsedAlt => '7',
            QcFlag::Estimated => '8',
            QcFlag::Missing => '9',
        }
    }

    /// Parse an Argo flag code
    pub fn from_code(code: char) -> Option<Self> {
        Self::all_values().into_iter().find(|flag| flag.code() == code)
    }

    /// Severity rank used when merging detector verdicts
    pub fn severity(self) -> u8 {
        match self {
            QcFlag::NoQc | QcFlag::NotUsed | QcFlag::NotUsedAlt => 0,
            QcFlag::Good => 1,
            QcFlag::Changed | QcFlag::Estimated => 2,
            QcFlag::ProbablyGood => 3,
            QcFlag::ProbablyBad => 4,
            QcFlag::Bad => 5,
            QcFlag::Missing => 6,
        }
    }

    /// Return the more severe of two flags
    pub fn most_severe(self, other: QcFlag) -> QcFlag {
        self.max(other)
    }

    /// Whether the flag counts towards the good-data percentage
    pub fn is_good(self) -> bool {
        matches!(self, QcFlag::Good | QcFlag::ProbablyGood)
    }

    /// Whether the cleaned profile masks a value carrying this flag
    pub fn is_masked(self) -> bool {
        self >= QcFlag::Bad
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            QcFlag::NoQc => "no_qc",
            QcFlag::Good => "good",
            QcFlag::ProbablyGood => "probably_good",
            QcFlag::ProbablyBad => "probably_bad",
            QcFlag::Bad => "bad",
            QcFlag::Changed => "changed",
            QcFlag::NotUsed => "not_used",
            QcFlag::NotUsedAlt => "not_used_alt",
            QcFlag::Estimated => "estimated",
            QcFlag::Missing => "missing",
        }
    }

    /// Get all possible flag values in code order
    pub fn all_values() -> [QcFlag; 10] {
        [
            QcFlag::NoQc,
            QcFlag::Good,
            QcFlag::ProbablyGood,
            QcFlag::ProbablyBad,
            QcFlag::Bad,
            QcFlag::Changed,
            QcFlag::NotUsed,
            QcFlag::NotUsedAlt,
            QcFlag::Estimated,
            QcFlag::Missing,
        ]
    }
}

impl Ord for QcFlag {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.severity(), self.code()).cmp(&(other.severity(), other.code()))
    }
}

impl PartialOrd for QcFlag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QcFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Profile-level data quality grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Excellent,
    Good,
    Acceptable,
    Poor,
    Unusable,
}

impl DataQuality {
    /// Grade a good-data percentage using inclusive lower bounds
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= quality_cutoffs::EXCELLENT {
            DataQuality::Excellent
        } else if percentage >= quality_cutoffs::GOOD {
            DataQuality::Good
        } else if percentage >= quality_cutoffs::ACCEPTABLE {
            DataQuality::Acceptable
        } else if percentage >= quality_cutoffs::POOR {
            DataQuality::Poor
        } else {
            DataQuality::Unusable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataQuality::Excellent => "excellent",
            DataQuality::Good => "good",
            DataQuality::Acceptable => "acceptable",
            DataQuality::Poor => "poor",
            DataQuality::Unusable => "unusable",
        }
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One float cycle's vertical cast
///
/// Measurement arrays are parallel: index `i` of every array refers to the
/// same depth level. Missing values are `None`, and a variable not measured
/// on this cycle is `None` at every level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub platform_number: String,
    pub cycle_number: i32,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Julian day relative to the Argo reference date
    #[serde(default)]
    pub juld: f64,
    #[serde(default)]
    pub temperature: Vec<Option<f64>>,
    #[serde(default)]
    pub salinity: Vec<Option<f64>>,
    #[serde(default)]
    pub pressure: Vec<Option<f64>>,
}

impl Profile {
    /// Create a profile with pressure levels and all-missing measurements
    pub fn new(
        platform_number: impl Into<String>,
        cycle_number: i32,
        pressure: Vec<Option<f64>>,
    ) -> Self {
        let levels = pressure.len();
        Self {
            platform_number: platform_number.into(),
            cycle_number,
            latitude: 0.0,
            longitude: 0.0,
            juld: 0.0,
            temperature: vec![None; levels],
            salinity: vec![None; levels],
            pressure,
        }
    }

    pub fn with_temperature(mut self, temperature: Vec<Option<f64>>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_salinity(mut self, salinity: Vec<Option<f64>>) -> Self {
        self.salinity = salinity;
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn with_juld(mut self, juld: f64) -> Self {
        self.juld = juld;
        self
    }

    /// Stable key used for reports: `<platform>_<cycle>`
    pub fn profile_id(&self) -> String {
        format!("{}_{}", self.platform_number, self.cycle_number)
    }

    /// Number of depth levels
    pub fn level_count(&self) -> usize {
        self.pressure.len()
    }

    /// Values of one tracked variable
    pub fn values(&self, variable: Variable) -> &[Option<f64>] {
        match variable {
            Variable::Temperature => &self.temperature,
            Variable::Salinity => &self.salinity,
            Variable::Pressure => &self.pressure,
        }
    }

    /// Mutable values of one tracked variable
    pub fn values_mut(&mut self, variable: Variable) -> &mut Vec<Option<f64>> {
        match variable {
            Variable::Temperature => &mut self.temperature,
            Variable::Salinity => &mut self.salinity,
            Variable::Pressure => &mut self.pressure,
        }
    }

    /// Value of a variable at a level, if present
    pub fn value_at(&self, variable: Variable, index: usize) -> Option<f64> {
        self.values(variable).get(index).copied().flatten()
    }

    /// Expand an absent (empty) temperature or salinity array to an
    /// all-missing array of the profile length.
    ///
    /// Applied when reading profile documents, where an unmeasured variable
    /// is usually written as `[]` or left out. The QC engine itself treats
    /// an empty array with non-zero levels as malformed.
    pub fn expand_absent_measurements(&mut self) {
        let levels = self.level_count();
        for variable in Variable::measured() {
            let values = self.values_mut(variable);
            if values.is_empty() {
                values.resize(levels, None);
            }
        }
    }

    /// Replace fill values and non-finite numbers with `None`
    pub fn normalize_missing(&mut self) {
        for variable in Variable::all() {
            for value in self.values_mut(variable).iter_mut() {
                if let Some(v) = *value {
                    if !v.is_finite() || v == ARGO_FILL_VALUE {
                        *value = None;
                    }
                }
            }
        }
    }

    /// Check the structural invariants: equal-length arrays and pressure
    /// levels in ascending order.
    pub fn validate_structure(&self) -> Result<()> {
        let levels = self.level_count();
        for variable in Variable::measured() {
            let len = self.values(variable).len();
            if len != levels {
                return Err(QcError::malformed(
                    self.profile_id(),
                    format!(
                        "{} has {} values but {} pressure levels",
                        variable, len, levels
                    ),
                ));
            }
        }

        let mut previous: Option<(usize, f64)> = None;
        for (index, pressure) in self.pressure.iter().enumerate() {
            let Some(p) = *pressure else { continue };
            if let Some((prev_index, prev)) = previous {
                if p < prev - PRESSURE_ORDER_TOLERANCE {
                    return Err(QcError::malformed(
                        self.profile_id(),
                        format!(
                            "pressure decreases from {} dbar at level {} to {} dbar at level {}",
                            prev, prev_index, p, index
                        ),
                    ));
                }
            }
            previous = Some((index, p));
        }

        Ok(())
    }
}
