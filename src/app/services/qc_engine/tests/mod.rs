//! Comprehensive tests for the QC engine module
//!
//! This module provides unit and scenario tests for all QC engine components.

pub mod controller_tests;
pub mod thresholds_tests;

// Test helper functions and fixtures
use crate::app::models::Profile;
use crate::app::services::qc_engine::thresholds::{ThresholdConfig, ThresholdPolicy};

/// Wrap plain values as present measurements
pub fn present(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Create a profile with only temperature measured
pub fn create_temperature_profile(temperature: &[f64], pressure: &[f64]) -> Profile {
    Profile::new("6901234", 7, present(pressure)).with_temperature(present(temperature))
}

/// Create a realistic, well-behaved tropical profile with eight levels
pub fn create_good_profile() -> Profile {
    Profile::new(
        "2902746",
        42,
        present(&[5.0, 25.0, 50.0, 100.0, 200.0, 400.0, 700.0, 1000.0]),
    )
    .with_location(-12.5, 75.25)
    .with_juld(26_000.5)
    .with_temperature(present(&[28.5, 28.4, 27.9, 24.0, 15.2, 11.0, 8.1, 6.0]))
    .with_salinity(present(&[34.9, 34.9, 35.0, 35.2, 35.1, 34.95, 34.8, 34.75]))
}

/// Create a profile where every value is missing
pub fn create_all_missing_profile(levels: usize) -> Profile {
    Profile::new("5904567", 3, vec![None; levels])
        .with_temperature(vec![None; levels])
        .with_salinity(vec![None; levels])
}

/// Default policy with a shorter minimum profile length
pub fn create_short_profile_policy(min_profile_length: usize) -> ThresholdPolicy {
    ThresholdPolicy::from_config(
        &ThresholdConfig::default().with_min_profile_length(min_profile_length),
    )
    .unwrap()
}
