//! Tests for threshold policy construction and lookup

use crate::app::models::Variable;
use crate::app::services::qc_engine::thresholds::{
    ThresholdConfig, ThresholdPolicy, VariableLimits, VariableLimitsConfig,
};
use crate::error::QcError;
use serde_json::json;

#[test]
fn test_default_policy_matches_documented_defaults() {
    let policy = ThresholdPolicy::default();

    let temp = policy.limits_for("TEMP").unwrap();
    assert_eq!(temp.min, -2.5);
    assert_eq!(temp.max, 40.0);
    assert_eq!(temp.spike_threshold, 5.0);
    assert_eq!(temp.gradient_threshold, 2.0);

    let psal = policy.limits(Variable::Salinity);
    assert_eq!((psal.min, psal.max), (2.0, 42.0));

    let pres = policy.limits(Variable::Pressure);
    assert_eq!((pres.min, pres.max), (0.0, 11000.0));

    assert_eq!(policy.density_inversion_threshold(), 0.05);
    assert_eq!(policy.min_good_data_percentage(), 70.0);
    assert_eq!(policy.max_depth_gap(), 500.0);
    assert_eq!(policy.min_profile_length(), 5);
}

#[test]
fn test_limits_for_unknown_variable_fails() {
    let policy = ThresholdPolicy::default();

    let error = policy.limits_for("DOXY").unwrap_err();
    assert!(matches!(error, QcError::UnknownVariable { ref variable } if variable == "DOXY"));
}

#[test]
fn test_limits_for_is_case_insensitive() {
    let policy = ThresholdPolicy::default();
    assert_eq!(
        policy.limits_for("temp").unwrap(),
        &VariableLimits::default_for(Variable::Temperature)
    );
}

#[test]
fn test_partial_override_falls_back_per_field() {
    let config = ThresholdConfig::default().with_variable(
        "TEMP",
        VariableLimitsConfig {
            max: Some(35.0),
            ..Default::default()
        },
    );

    let policy = ThresholdPolicy::from_config(&config).unwrap();
    let temp = policy.limits(Variable::Temperature);

    assert_eq!(temp.max, 35.0);
    assert_eq!(temp.min, -2.5);
    assert_eq!(temp.spike_threshold, 5.0);
    // Untouched variables keep their defaults
    assert_eq!(
        policy.limits(Variable::Salinity),
        VariableLimits::default_for(Variable::Salinity)
    );
}

#[test]
fn test_from_value_reads_flat_mapping() {
    let policy = ThresholdPolicy::from_value(json!({
        "PSAL": { "min": 30.0, "max": 40.0, "spike_threshold": 0.5, "gradient_threshold": 0.2 },
        "density_inversion_threshold": 0.03,
        "max_depth_gap": 250,
        "min_profile_length": 10
    }))
    .unwrap();

    let psal = policy.limits(Variable::Salinity);
    assert_eq!(psal.min, 30.0);
    assert_eq!(psal.spike_threshold, 0.5);
    assert_eq!(policy.density_inversion_threshold(), 0.03);
    assert_eq!(policy.max_depth_gap(), 250.0);
    assert_eq!(policy.min_profile_length(), 10);
    assert_eq!(policy.min_good_data_percentage(), 70.0);
}

#[test]
fn test_new_variable_requires_complete_limits() {
    let incomplete = json!({ "DOXY": { "min": 0.0 } });
    assert!(matches!(
        ThresholdPolicy::from_value(incomplete),
        Err(QcError::Configuration { .. })
    ));

    let complete = json!({
        "DOXY": { "min": 0.0, "max": 600.0, "spike_threshold": 50.0, "gradient_threshold": 10.0 }
    });
    let policy = ThresholdPolicy::from_value(complete).unwrap();
    assert_eq!(policy.limits_for("DOXY").unwrap().max, 600.0);
}

#[test]
fn test_inverted_limits_are_rejected() {
    let config = ThresholdConfig::default().with_variable(
        "TEMP",
        VariableLimitsConfig {
            min: Some(10.0),
            max: Some(5.0),
            ..Default::default()
        },
    );

    assert!(matches!(
        ThresholdPolicy::from_config(&config),
        Err(QcError::Configuration { .. })
    ));
}

#[test]
fn test_invalid_scalars_are_rejected() {
    let bad_percentage = ThresholdConfig::default().with_min_good_data_percentage(120.0);
    assert!(ThresholdPolicy::from_config(&bad_percentage).is_err());

    let bad_gap = ThresholdConfig::default().with_max_depth_gap(0.0);
    assert!(ThresholdPolicy::from_config(&bad_gap).is_err());

    let bad_density = ThresholdConfig::default().with_density_inversion_threshold(-1.0);
    assert!(ThresholdPolicy::from_config(&bad_density).is_err());
}

#[test]
fn test_policy_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ThresholdPolicy>();
}
