//! Depth coverage check

use crate::app::models::Profile;
use crate::app::services::qc_engine::thresholds::ThresholdPolicy;
use crate::constants::issues;

use super::DetectorOutcome;

/// Largest gap between consecutive present pressure levels
pub fn max_pressure_gap(profile: &Profile) -> Option<f64> {
    let pressures: Vec<f64> = profile.pressure.iter().flatten().copied().collect();
    pressures
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold(None, |largest: Option<f64>, gap| {
            Some(largest.map_or(gap, |l| l.max(gap)))
        })
}

/// Report a profile-level issue when the largest gap exceeds `max_depth_gap`
///
/// Individual measurements are never flagged by this check.
pub fn check_depth_gap(profile: &Profile, policy: &ThresholdPolicy) -> DetectorOutcome {
    let mut outcome = DetectorOutcome::default();

    let Some(gap) = max_pressure_gap(profile) else {
        return outcome;
    };

    outcome
        .metadata
        .insert("max_depth_gap_observed".to_string(), serde_json::json!(gap));

    if gap > policy.max_depth_gap() {
        outcome.issues.push(format!(
            "{}: {:.1} dbar exceeds {:.1} dbar",
            issues::LARGE_DEPTH_GAP,
            gap,
            policy.max_depth_gap()
        ));
        outcome.count = 1;
    }

    outcome
}
