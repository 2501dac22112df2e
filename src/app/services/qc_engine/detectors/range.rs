//! Global range check

use crate::app::models::{Profile, QcFlag, Variable};
use crate::app::services::qc_engine::thresholds::ThresholdPolicy;
use crate::constants::issues;

use super::DetectorOutcome;

/// Flag every present measurement outside `[min, max]` as bad, the rest good
///
/// A level whose pressure lies outside the pressure limits invalidates all
/// measurements taken there. The count is the number of bad measurements.
pub fn check_range(profile: &Profile, policy: &ThresholdPolicy) -> DetectorOutcome {
    let mut outcome = DetectorOutcome::default();
    let pressure_limits = policy.limits(Variable::Pressure);

    let bad_levels: Vec<(usize, f64)> = profile
        .pressure
        .iter()
        .enumerate()
        .filter_map(|(index, p)| p.map(|p| (index, p)))
        .filter(|(_, p)| !pressure_limits.contains(*p))
        .collect();

    for (index, pressure) in &bad_levels {
        outcome.issues.push(format!(
            "{}: {} dbar at level {}",
            issues::PRESSURE_OUT_OF_RANGE,
            pressure,
            index
        ));
    }

    for variable in Variable::measured() {
        let limits = policy.limits(variable);
        for (index, value) in profile.values(variable).iter().enumerate() {
            let Some(value) = *value else { continue };

            let bad_pressure = bad_levels.iter().any(|(level, _)| *level == index);
            if bad_pressure || !limits.contains(value) {
                outcome.flag(variable, index, QcFlag::Bad);
                outcome.count += 1;
            } else {
                outcome.flag(variable, index, QcFlag::Good);
            }
        }
    }

    outcome
}
