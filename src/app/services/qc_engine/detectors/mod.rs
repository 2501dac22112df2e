//! Per-profile QC detectors
//!
//! Each detector is a pure function of a profile and the threshold policy.
//! It returns flag assignments for individual measurements together with a
//! count of the anomalies it found and any profile-level findings. Missing
//! values never enter the arithmetic of any detector.
//!
//! Detectors run in a fixed order: range, spike, gradient, density
//! inversion, depth gap. Gradient and density checks only use values that
//! pass the range check.

pub mod density;
pub mod depth_gap;
pub mod gradient;
pub mod range;
pub mod spike;

use crate::app::models::{Profile, QcFlag, Variable};
use std::collections::BTreeMap;
use tracing::trace;

use super::thresholds::ThresholdPolicy;

pub use density::check_density_inversion;
pub use depth_gap::check_depth_gap;
pub use gradient::check_gradient;
pub use range::check_range;
pub use spike::check_spike;

/// A single verdict for one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagAssignment {
    pub variable: Variable,
    pub index: usize,
    pub flag: QcFlag,
}

impl FlagAssignment {
    pub fn new(variable: Variable, index: usize, flag: QcFlag) -> Self {
        Self {
            variable,
            index,
            flag,
        }
    }
}

/// Result of running one detector over a profile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorOutcome {
    /// Per-measurement verdicts
    pub assignments: Vec<FlagAssignment>,
    /// Number of anomalies detected
    pub count: usize,
    /// Profile-level findings
    pub issues: Vec<String>,
    /// Auxiliary values worth carrying into the report
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl DetectorOutcome {
    pub(crate) fn flag(&mut self, variable: Variable, index: usize, flag: QcFlag) {
        self.assignments
            .push(FlagAssignment::new(variable, index, flag));
    }
}

/// The detectors in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    Range,
    Spike,
    Gradient,
    DensityInversion,
    DepthGap,
}

impl DetectorKind {
    /// Fixed execution order
    pub const ORDER: [DetectorKind; 5] = [
        DetectorKind::Range,
        DetectorKind::Spike,
        DetectorKind::Gradient,
        DetectorKind::DensityInversion,
        DetectorKind::DepthGap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DetectorKind::Range => "range",
            DetectorKind::Spike => "spike",
            DetectorKind::Gradient => "gradient",
            DetectorKind::DensityInversion => "density_inversion",
            DetectorKind::DepthGap => "depth_gap",
        }
    }

    /// Run this detector
    pub fn run(self, profile: &Profile, policy: &ThresholdPolicy) -> DetectorOutcome {
        match self {
            DetectorKind::Range => check_range(profile, policy),
            DetectorKind::Spike => check_spike(profile, policy),
            DetectorKind::Gradient => check_gradient(profile, policy),
            DetectorKind::DensityInversion => check_density_inversion(profile, policy),
            DetectorKind::DepthGap => check_depth_gap(profile, policy),
        }
    }
}

/// Run every detector in the fixed order
pub fn run_all(profile: &Profile, policy: &ThresholdPolicy) -> Vec<(DetectorKind, DetectorOutcome)> {
    DetectorKind::ORDER
        .into_iter()
        .map(|kind| {
            let outcome = kind.run(profile, policy);
            trace!(
                "{} detector on {}: {} assignments, count {}",
                kind.name(),
                profile.profile_id(),
                outcome.assignments.len(),
                outcome.count
            );
            (kind, outcome)
        })
        .collect()
}

/// Pressure at a level if present and inside the pressure limits
pub(crate) fn usable_pressure(
    profile: &Profile,
    policy: &ThresholdPolicy,
    index: usize,
) -> Option<f64> {
    let pressure = profile.value_at(Variable::Pressure, index)?;
    policy
        .limits(Variable::Pressure)
        .contains(pressure)
        .then_some(pressure)
}

/// Measurement at a level if present and inside its own limits
pub(crate) fn usable_value(
    profile: &Profile,
    policy: &ThresholdPolicy,
    variable: Variable,
    index: usize,
) -> Option<f64> {
    let value = profile.value_at(variable, index)?;
    policy.limits(variable).contains(value).then_some(value)
}

/// Median of three values
pub(crate) fn median3(a: f64, b: f64, c: f64) -> f64 {
    a.min(b).max(a.max(b).min(c))
}
