//! Vertical gradient check

use crate::app::models::{Profile, QcFlag, Variable};
use crate::app::services::qc_engine::thresholds::ThresholdPolicy;
use crate::constants::{GRADIENT_EPSILON, issues};

use super::{DetectorOutcome, usable_pressure, usable_value};

/// Flag both ends of any step whose gradient per dbar exceeds the threshold
///
/// Pairs are formed from consecutive usable points, so missing and
/// out-of-range values are bridged rather than evaluated. Levels sharing
/// the same pressure are reported as duplicate depths and skipped; any
/// other spacing is floored at [`GRADIENT_EPSILON`] dbar.
pub fn check_gradient(profile: &Profile, policy: &ThresholdPolicy) -> DetectorOutcome {
    let mut outcome = DetectorOutcome::default();

    let mut previous_level: Option<(usize, f64)> = None;
    for (index, pressure) in profile.pressure.iter().enumerate() {
        let Some(pressure) = *pressure else { continue };
        if let Some((prev_index, prev_pressure)) = previous_level {
            if pressure == prev_pressure {
                outcome.issues.push(format!(
                    "{}: levels {} and {} both at {} dbar",
                    issues::DUPLICATE_DEPTH,
                    prev_index,
                    index,
                    pressure
                ));
            }
        }
        previous_level = Some((index, pressure));
    }

    for variable in Variable::measured() {
        let threshold = policy.limits(variable).gradient_threshold;
        let mut previous: Option<(usize, f64, f64)> = None;

        for index in 0..profile.level_count() {
            let Some(value) = usable_value(profile, policy, variable, index) else {
                continue;
            };
            let Some(pressure) = usable_pressure(profile, policy, index) else {
                continue;
            };

            if let Some((prev_index, prev_pressure, prev_value)) = previous {
                // Duplicate depths are already reported above
                if pressure != prev_pressure {
                    let dp = (pressure - prev_pressure).max(GRADIENT_EPSILON);
                    let gradient = (value - prev_value).abs() / dp;
                    if gradient > threshold {
                        outcome.flag(variable, prev_index, QcFlag::ProbablyBad);
                        outcome.flag(variable, index, QcFlag::ProbablyBad);
                        outcome.count += 1;
                    }
                }
            }

            previous = Some((index, pressure, value));
        }
    }

    outcome
}
