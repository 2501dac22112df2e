//! Quality control engine for Argo profiles
//!
//! This module decides, per measurement and per profile, whether vertical
//! temperature/salinity profiles are physically plausible. It produces a
//! cleaned copy of each profile together with a structured report, and keeps
//! run-wide statistics that can be updated from many worker threads.
//!
//! # Architecture
//!
//! The module is organized into logical components:
//! - [`thresholds`] - Immutable per-run threshold policy built from configuration
//! - [`detectors`] - Range, spike, gradient, density-inversion and depth-gap checks
//! - [`flags`] - Severity merge of detector verdicts, classification and cleaning
//! - [`report_builder`] - Assembly of the per-profile [`QcReport`]
//! - [`stats`] - Thread-safe run statistics and snapshots
//! - [`controller`] - The [`QualityController`] entry point
//!
//! # Processing Pipeline
//!
//! For every profile the controller:
//!
//! 1. **Validates structure**: equal-length arrays, ascending pressure
//! 2. **Runs detectors**: range → spike → gradient → density inversion → depth gap
//! 3. **Aggregates flags**: the most severe verdict wins per measurement
//! 4. **Classifies**: good-data percentage graded excellent … unusable
//! 5. **Applies the rejection gate**: too short or too little good data
//! 6. **Records statistics**: exactly once per successfully evaluated profile
//!
//! # Example Usage
//!
//! ```rust
//! use argo_qc::app::models::Profile;
//! use argo_qc::app::services::qc_engine::QualityController;
//!
//! # fn example() -> argo_qc::Result<()> {
//! let controller = QualityController::default();
//!
//! let profile = Profile::new("2902746", 12, vec![Some(10.0), Some(20.0), Some(30.0)])
//!     .with_temperature(vec![Some(12.1), Some(11.8), Some(11.2)])
//!     .with_salinity(vec![Some(35.1), Some(35.1), Some(35.2)]);
//!
//! let (cleaned, report) = controller.clean_profile_data(&profile)?;
//! assert_eq!(cleaned.temperature.len(), profile.temperature.len());
//! println!("{}", report.summary());
//! println!("{}", controller.snapshot().summary());
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod detectors;
pub mod flags;
pub mod report_builder;
pub mod stats;
pub mod thresholds;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use crate::app::models::QcReport;
pub use controller::{QcEvaluation, QualityController, evaluate_profile};
pub use detectors::{DetectorKind, DetectorOutcome, FlagAssignment};
pub use flags::{FlagMatrix, FlagSummary, clean_profile, good_data_percentage};
pub use report_builder::QcReportBuilder;
pub use stats::{ProfileOutcome, RunStatistics, StatisticsSnapshot};
pub use thresholds::{ThresholdConfig, ThresholdPolicy, VariableLimits, VariableLimitsConfig};
