//! Spike check on the ordered depth series

use crate::app::models::{Profile, QcFlag, Variable};
use crate::app::services::qc_engine::thresholds::ThresholdPolicy;

use super::{DetectorOutcome, median3};

/// Flag interior points that stand out from the median of their neighbourhood
///
/// For each interior point with both neighbours present the deviation
/// `|v[i] - median(v[i-1], v[i], v[i+1])|` is compared with the variable's
/// spike threshold. First and last levels are never flagged here.
pub fn check_spike(profile: &Profile, policy: &ThresholdPolicy) -> DetectorOutcome {
    let mut outcome = DetectorOutcome::default();

    for variable in Variable::measured() {
        let threshold = policy.limits(variable).spike_threshold;
        let values = profile.values(variable);

        for index in 1..values.len().saturating_sub(1) {
            let (Some(above), Some(value), Some(below)) =
                (values[index - 1], values[index], values[index + 1])
            else {
                continue;
            };

            let deviation = (value - median3(above, value, below)).abs();
            if deviation > threshold {
                outcome.flag(variable, index, QcFlag::ProbablyBad);
                outcome.count += 1;
            }
        }
    }

    outcome
}
