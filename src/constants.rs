//! Application constants for the Argo QC engine
//!
//! This module contains the default thresholds, classification cutoffs,
//! variable names and numeric guards used throughout the crate.

// =============================================================================
// Tracked Variables
// =============================================================================

/// Argo parameter codes for the tracked variables
pub mod variables {
    /// Sea temperature in degrees Celsius (ITS-90)
    pub const TEMP: &str = "TEMP";

    /// Practical salinity (PSU)
    pub const PSAL: &str = "PSAL";

    /// Sea pressure in decibars, the vertical coordinate
    pub const PRES: &str = "PRES";

    /// All tracked variable codes
    pub const ALL: &[&str] = &[TEMP, PSAL, PRES];
}

// =============================================================================
// Default Thresholds
// =============================================================================

/// Default per-variable limits: (min, max, spike_threshold, gradient_threshold)
pub mod default_limits {
    pub const TEMP: (f64, f64, f64, f64) = (-2.5, 40.0, 5.0, 2.0);
    pub const PSAL: (f64, f64, f64, f64) = (2.0, 42.0, 2.0, 1.0);
    pub const PRES: (f64, f64, f64, f64) = (0.0, 11000.0, 100.0, 50.0);
}

/// Maximum tolerated density decrease with depth (kg/m³)
pub const DEFAULT_DENSITY_INVERSION_THRESHOLD: f64 = 0.05;

/// Minimum percentage of good measurements for a profile to be accepted
pub const DEFAULT_MIN_GOOD_DATA_PERCENTAGE: f64 = 70.0;

/// Maximum allowed gap between consecutive pressure levels (dbar)
pub const DEFAULT_MAX_DEPTH_GAP: f64 = 500.0;

/// Minimum number of present measurements for a profile to be accepted
pub const DEFAULT_MIN_PROFILE_LENGTH: usize = 5;

// =============================================================================
// Numeric Guards
// =============================================================================

/// Smallest pressure difference used as a gradient denominator (dbar)
pub const GRADIENT_EPSILON: f64 = 1e-6;

/// Allowed pressure decrease between consecutive levels before a profile
/// is considered structurally out of order (dbar)
pub const PRESSURE_ORDER_TOLERANCE: f64 = 0.0;

/// Argo NetCDF fill value for missing measurements
pub const ARGO_FILL_VALUE: f64 = 99999.0;

// =============================================================================
// Data Quality Classification
// =============================================================================

/// Inclusive lower bounds of the good-data percentage for each grade
pub mod quality_cutoffs {
    pub const EXCELLENT: f64 = 95.0;
    pub const GOOD: f64 = 85.0;
    pub const ACCEPTABLE: f64 = 70.0;
    pub const POOR: f64 = 40.0;
}

// =============================================================================
// Issue Messages
// =============================================================================

/// Human-readable findings appended to QC reports
pub mod issues {
    pub const LARGE_DEPTH_GAP: &str = "large depth gap";
    pub const DUPLICATE_DEPTH: &str = "duplicate depth level";
    pub const PRESSURE_OUT_OF_RANGE: &str = "pressure out of range";
    pub const INSUFFICIENT_LENGTH: &str = "profile rejected: insufficient measurements";
    pub const INSUFFICIENT_GOOD_DATA: &str = "profile rejected: insufficient good data";
}

// =============================================================================
// Processing Defaults
// =============================================================================

/// Default number of concurrent QC workers
pub const DEFAULT_MAX_WORKERS: usize = 2;

/// Default glob pattern for profile documents inside an input directory
pub const DEFAULT_PROFILE_PATTERN: &str = "**/*.json";

/// Output file name for cleaned profiles written by the JSON Lines sink
pub const PROFILES_OUTPUT_FILE: &str = "profiles.jsonl";

/// Output file name for QC reports written by the JSON Lines sink
pub const REPORTS_OUTPUT_FILE: &str = "qc_reports.jsonl";

/// Default configuration path used by the CLI
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Log levels accepted in the logging configuration
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
