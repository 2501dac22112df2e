//! Density inversion check

use crate::app::models::{Profile, QcFlag, Variable};
use crate::app::services::qc_engine::thresholds::ThresholdPolicy;
use crate::app::services::seawater::potential_density_anomaly;

use super::{DetectorOutcome, usable_pressure, usable_value};

/// Flag adjacent levels where potential density decreases with depth by more
/// than the configured tolerance
///
/// A level takes part only when temperature, salinity and pressure are all
/// present and within range. Pairs missing any of them are skipped.
pub fn check_density_inversion(profile: &Profile, policy: &ThresholdPolicy) -> DetectorOutcome {
    let mut outcome = DetectorOutcome::default();
    let tolerance = policy.density_inversion_threshold();

    let sigma_theta: Vec<Option<f64>> = (0..profile.level_count())
        .map(|index| {
            let temperature = usable_value(profile, policy, Variable::Temperature, index)?;
            let salinity = usable_value(profile, policy, Variable::Salinity, index)?;
            let pressure = usable_pressure(profile, policy, index)?;
            Some(potential_density_anomaly(salinity, temperature, pressure))
        })
        .collect();

    let mut largest_inversion: f64 = 0.0;
    for (upper_index, pair) in sigma_theta.windows(2).enumerate() {
        let (Some(upper), Some(lower)) = (pair[0], pair[1]) else {
            continue;
        };

        let decrease = upper - lower;
        if decrease > tolerance {
            let lower_index = upper_index + 1;
            for variable in Variable::measured() {
                outcome.flag(variable, upper_index, QcFlag::ProbablyBad);
                outcome.flag(variable, lower_index, QcFlag::ProbablyBad);
            }
            outcome.count += 1;
            largest_inversion = largest_inversion.max(decrease);
        }
    }

    if outcome.count > 0 {
        outcome.metadata.insert(
            "largest_density_inversion".to_string(),
            serde_json::json!(largest_inversion),
        );
    }

    outcome
}
