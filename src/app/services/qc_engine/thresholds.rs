//! Threshold policy for the QC battery
//!
//! The policy is built once from a configuration mapping, falling back to
//! the documented defaults for anything not supplied, and is read-only
//! afterwards so it can be shared between worker threads behind an `Arc`.

use crate::app::models::Variable;
use crate::constants::{
    DEFAULT_DENSITY_INVERSION_THRESHOLD, DEFAULT_MAX_DEPTH_GAP, DEFAULT_MIN_GOOD_DATA_PERCENTAGE,
    DEFAULT_MIN_PROFILE_LENGTH, default_limits,
};
use crate::error::{QcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Numeric limits for one variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableLimits {
    pub min: f64,
    pub max: f64,
    pub spike_threshold: f64,
    pub gradient_threshold: f64,
}

impl VariableLimits {
    fn from_tuple((min, max, spike_threshold, gradient_threshold): (f64, f64, f64, f64)) -> Self {
        Self {
            min,
            max,
            spike_threshold,
            gradient_threshold,
        }
    }

    /// Default limits for a tracked variable
    pub fn default_for(variable: Variable) -> Self {
        match variable {
            Variable::Temperature => Self::from_tuple(default_limits::TEMP),
            Variable::Salinity => Self::from_tuple(default_limits::PSAL),
            Variable::Pressure => Self::from_tuple(default_limits::PRES),
        }
    }

    /// Whether a value lies inside `[min, max]`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn overlay(mut self, partial: &VariableLimitsConfig) -> Self {
        if let Some(min) = partial.min {
            self.min = min;
        }
        if let Some(max) = partial.max {
            self.max = max;
        }
        if let Some(spike) = partial.spike_threshold {
            self.spike_threshold = spike;
        }
        if let Some(gradient) = partial.gradient_threshold {
            self.gradient_threshold = gradient;
        }
        self
    }

    fn validate(&self, variable: &str) -> Result<()> {
        let finite = [self.min, self.max, self.spike_threshold, self.gradient_threshold]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(QcError::configuration(format!(
                "{variable}: limits must be finite numbers"
            )));
        }
        if self.min >= self.max {
            return Err(QcError::configuration(format!(
                "{variable}: min ({}) must be below max ({})",
                self.min, self.max
            )));
        }
        if self.spike_threshold < 0.0 || self.gradient_threshold < 0.0 {
            return Err(QcError::configuration(format!(
                "{variable}: spike and gradient thresholds must be non-negative"
            )));
        }
        Ok(())
    }
}

/// Partially specified limits for one variable as found in configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableLimitsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spike_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_threshold: Option<f64>,
}

/// Threshold configuration mapping
///
/// Mirrors the flat layout of the configuration file: scalar settings sit
/// next to per-variable objects keyed by parameter code.
///
/// ```json
/// {
///   "TEMP": { "min": -2.5, "max": 40.0 },
///   "density_inversion_threshold": 0.05,
///   "min_profile_length": 5
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_inversion_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_good_data_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth_gap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_profile_length: Option<usize>,
    #[serde(flatten)]
    pub variables: BTreeMap<String, VariableLimitsConfig>,
}

impl ThresholdConfig {
    /// Override the limits of one variable
    pub fn with_variable(mut self, code: impl Into<String>, limits: VariableLimitsConfig) -> Self {
        self.variables.insert(code.into(), limits);
        self
    }

    pub fn with_max_depth_gap(mut self, gap: f64) -> Self {
        self.max_depth_gap = Some(gap);
        self
    }

    pub fn with_min_profile_length(mut self, length: usize) -> Self {
        self.min_profile_length = Some(length);
        self
    }

    pub fn with_min_good_data_percentage(mut self, percentage: f64) -> Self {
        self.min_good_data_percentage = Some(percentage);
        self
    }

    pub fn with_density_inversion_threshold(mut self, threshold: f64) -> Self {
        self.density_inversion_threshold = Some(threshold);
        self
    }
}

/// Immutable per-run threshold policy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdPolicy {
    limits: BTreeMap<String, VariableLimits>,
    density_inversion_threshold: f64,
    min_good_data_percentage: f64,
    max_depth_gap: f64,
    min_profile_length: usize,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        let limits = Variable::all()
            .into_iter()
            .map(|v| (v.code().to_string(), VariableLimits::default_for(v)))
            .collect();

        Self {
            limits,
            density_inversion_threshold: DEFAULT_DENSITY_INVERSION_THRESHOLD,
            min_good_data_percentage: DEFAULT_MIN_GOOD_DATA_PERCENTAGE,
            max_depth_gap: DEFAULT_MAX_DEPTH_GAP,
            min_profile_length: DEFAULT_MIN_PROFILE_LENGTH,
        }
    }
}

impl ThresholdPolicy {
    /// Build a policy from configuration, using defaults for missing keys
    ///
    /// Variable codes are normalised to upper case. Codes other than the
    /// tracked ones must supply all four limits since there is no default
    /// to fall back to.
    pub fn from_config(config: &ThresholdConfig) -> Result<Self> {
        let mut policy = Self::default();

        for (code, partial) in &config.variables {
            let key = code.trim().to_ascii_uppercase();
            let base = match policy.limits.get(&key) {
                Some(existing) => *existing,
                None => match (
                    partial.min,
                    partial.max,
                    partial.spike_threshold,
                    partial.gradient_threshold,
                ) {
                    (Some(min), Some(max), Some(spike), Some(gradient)) => {
                        VariableLimits::from_tuple((min, max, spike, gradient))
                    }
                    _ => {
                        return Err(QcError::configuration(format!(
                            "{key}: no defaults exist, all of min, max, spike_threshold and gradient_threshold are required"
                        )));
                    }
                },
            };
            let limits = base.overlay(partial);
            limits.validate(&key)?;
            debug!("Threshold override for {}: {:?}", key, limits);
            policy.limits.insert(key, limits);
        }

        if let Some(threshold) = config.density_inversion_threshold {
            policy.density_inversion_threshold = threshold;
        }
        if let Some(percentage) = config.min_good_data_percentage {
            policy.min_good_data_percentage = percentage;
        }
        if let Some(gap) = config.max_depth_gap {
            policy.max_depth_gap = gap;
        }
        if let Some(length) = config.min_profile_length {
            policy.min_profile_length = length;
        }

        policy.validate_scalars()?;
        Ok(policy)
    }

    /// Build a policy from an arbitrary JSON mapping
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: ThresholdConfig = serde_json::from_value(value)?;
        Self::from_config(&config)
    }

    fn validate_scalars(&self) -> Result<()> {
        if !self.density_inversion_threshold.is_finite() || self.density_inversion_threshold < 0.0 {
            return Err(QcError::configuration(
                "density_inversion_threshold must be a non-negative number",
            ));
        }
        if !(0.0..=100.0).contains(&self.min_good_data_percentage) {
            return Err(QcError::configuration(
                "min_good_data_percentage must be between 0 and 100",
            ));
        }
        if !self.max_depth_gap.is_finite() || self.max_depth_gap <= 0.0 {
            return Err(QcError::configuration(
                "max_depth_gap must be a positive number",
            ));
        }
        Ok(())
    }

    /// Limits for a variable by parameter code
    pub fn limits_for(&self, variable: &str) -> Result<&VariableLimits> {
        self.limits
            .get(&variable.trim().to_ascii_uppercase())
            .ok_or_else(|| QcError::unknown_variable(variable))
    }

    /// Limits for a tracked variable
    pub fn limits(&self, variable: Variable) -> VariableLimits {
        // Tracked variables are seeded from defaults and can only be overridden.
        self.limits
            .get(variable.code())
            .copied()
            .unwrap_or_else(|| VariableLimits::default_for(variable))
    }

    /// All configured variables and their limits
    pub fn variables(&self) -> impl Iterator<Item = (&str, &VariableLimits)> {
        self.limits.iter().map(|(code, limits)| (code.as_str(), limits))
    }

    pub fn density_inversion_threshold(&self) -> f64 {
        self.density_inversion_threshold
    }

    pub fn min_good_data_percentage(&self) -> f64 {
        self.min_good_data_percentage
    }

    pub fn max_depth_gap(&self) -> f64 {
        self.max_depth_gap
    }

    pub fn min_profile_length(&self) -> usize {
        self.min_profile_length
    }
}
