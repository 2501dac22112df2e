//! Tests for the QC entry point, covering the end-to-end scenarios

use super::*;
use crate::app::models::{DataQuality, QcFlag, Variable};
use crate::app::services::qc_engine::controller::{QualityController, evaluate_profile};
use crate::app::services::qc_engine::stats::RunStatistics;
use crate::app::services::qc_engine::thresholds::{ThresholdConfig, ThresholdPolicy};
use crate::constants::ARGO_FILL_VALUE;
use crate::error::QcError;
use std::sync::Arc;
use std::thread;

fn scenario_one_profile() -> Profile {
    create_temperature_profile(&[10.0, 10.1, 55.0, 10.3], &[10.0, 20.0, 30.0, 40.0])
}

#[test]
fn test_scenario_range_outlier_with_default_thresholds() {
    let controller = QualityController::default();
    let profile = scenario_one_profile();

    let (cleaned, report) = controller.clean_profile_data(&profile).unwrap();

    assert_eq!(report.profile_id(), "6901234_7");
    assert_eq!(report.total_measurements(), 4);
    assert_eq!(report.flag_count(QcFlag::Bad), 1);
    assert_eq!(report.flag_count(QcFlag::Good), 3);
    assert_eq!(report.good_data_percentage(), 75.0);
    assert_eq!(report.outliers_removed(), 1);
    assert_eq!(report.spike_detections(), 1);
    assert_eq!(report.gradient_anomalies(), 0);
    assert_eq!(cleaned.temperature[2], None);

    // 75% grades as acceptable, but four measurements are below the
    // default minimum profile length of five
    assert_eq!(report.metadata()["graded_quality"], "acceptable");
    assert!(report.is_rejected());
    assert_eq!(report.data_quality(), DataQuality::Unusable);
    assert!(report.has_issue(crate::constants::issues::INSUFFICIENT_LENGTH));
}

#[test]
fn test_scenario_range_outlier_classified_acceptable() {
    let policy = create_short_profile_policy(4);
    let evaluation = evaluate_profile(&scenario_one_profile(), &policy).unwrap();

    assert_eq!(
        evaluation.flags.flag(Variable::Temperature, 2),
        Some(QcFlag::Bad)
    );
    assert_eq!(evaluation.report.good_data_percentage(), 75.0);
    assert_eq!(evaluation.report.data_quality(), DataQuality::Acceptable);
    assert!(!evaluation.report.is_rejected());
}

#[test]
fn test_scenario_depth_gap_issue() {
    let profile = create_temperature_profile(
        &[10.0, 10.0, 10.0, 10.0, 10.0],
        &[10.0, 20.0, 21.0, 30.0, 31.0],
    );

    let lenient = ThresholdPolicy::from_config(&ThresholdConfig::default().with_max_depth_gap(15.0))
        .unwrap();
    let report = evaluate_profile(&profile, &lenient).unwrap().report;
    assert!(!report.has_issue("large depth gap"));

    let strict = ThresholdPolicy::from_config(&ThresholdConfig::default().with_max_depth_gap(5.0))
        .unwrap();
    let report = evaluate_profile(&profile, &strict).unwrap().report;
    assert!(report.has_issue("large depth gap"));
    // Depth gaps never flag individual points
    assert_eq!(report.flag_count(QcFlag::Good), 5);
}

#[test]
fn test_scenario_concurrent_calls_each_count_once() {
    let controller = Arc::new(QualityController::default());

    let first = {
        let controller = Arc::clone(&controller);
        thread::spawn(move || controller.clean_profile_data(&create_good_profile()))
    };
    let second = {
        let controller = Arc::clone(&controller);
        thread::spawn(move || controller.clean_profile_data(&scenario_one_profile()))
    };

    assert!(first.join().unwrap().is_ok());
    assert!(second.join().unwrap().is_ok());

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.total_profiles, 2);
    assert_eq!(snapshot.profiles_processed, 1);
    assert_eq!(snapshot.profiles_rejected, 1);
    assert_eq!(snapshot.success_rate_percent, 50.0);
}

#[test]
fn test_scenario_all_missing_profile() {
    let controller = QualityController::default();
    let profile = create_all_missing_profile(6);

    let (cleaned, report) = controller.clean_profile_data(&profile).unwrap();

    assert_eq!(report.total_measurements(), 0);
    assert_eq!(report.good_data_percentage(), 0.0);
    assert_eq!(report.data_quality(), DataQuality::Unusable);
    assert!(report.is_rejected());
    assert!(report.flags_summary().is_empty());
    assert_eq!(cleaned.temperature.len(), 6);
    assert_eq!(controller.snapshot().profiles_rejected, 1);
}

#[test]
fn test_good_profile_is_excellent() {
    let controller = QualityController::default();
    let profile = create_good_profile();

    let (cleaned, report) = controller.clean_profile_data(&profile).unwrap();

    assert_eq!(report.total_measurements(), 16);
    assert_eq!(report.good_data_percentage(), 100.0);
    assert_eq!(report.data_quality(), DataQuality::Excellent);
    assert!(!report.is_rejected());
    assert!(report.issues().is_empty());
    assert_eq!(cleaned, profile);
}

#[test]
fn test_cleaning_preserves_lengths() {
    let controller = QualityController::default();
    let profiles = [
        scenario_one_profile(),
        create_good_profile(),
        create_all_missing_profile(3),
        create_temperature_profile(&[-9.0, 50.0, 60.0], &[5.0, 10.0, 15.0]),
    ];

    for profile in &profiles {
        let (cleaned, _) = controller.clean_profile_data(profile).unwrap();
        for variable in Variable::all() {
            assert_eq!(cleaned.values(variable).len(), profile.values(variable).len());
        }
    }
}

#[test]
fn test_empty_temperature_array_is_malformed() {
    let controller = QualityController::default();
    let profile = Profile::new("1", 1, present(&[10.0, 20.0, 30.0, 40.0]))
        .with_temperature(Vec::new())
        .with_salinity(present(&[35.0; 4]));

    let result = controller.clean_profile_data(&profile);

    assert!(matches!(result, Err(QcError::MalformedProfile { .. })));
    assert_eq!(controller.snapshot().total_profiles, 0);
}

#[test]
fn test_new_profile_has_all_missing_measurements() {
    let controller = QualityController::default();
    let profile = Profile::new("1", 1, present(&[10.0, 20.0, 30.0, 40.0]))
        .with_salinity(present(&[35.0; 4]));

    let (cleaned, report) = controller.clean_profile_data(&profile).unwrap();

    assert_eq!(profile.temperature, vec![None; 4]);
    assert_eq!(cleaned.temperature.len(), 4);
    assert_eq!(report.total_measurements(), 4);
}

#[test]
fn test_flag_summary_sums_to_total_measurements() {
    let profile = Profile::new("1", 1, present(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]))
        .with_temperature(vec![Some(10.0), Some(10.2), None, Some(45.0), Some(10.1), Some(9.9)])
        .with_salinity(present(&[35.0, 35.0, 34.9, 35.1, 1.0, 35.0]));

    let report = evaluate_profile(&profile, &ThresholdPolicy::default())
        .unwrap()
        .report;

    assert_eq!(report.total_measurements(), 11);
    assert_eq!(
        report.flags_summary().values().sum::<usize>(),
        report.total_measurements()
    );
}

#[test]
fn test_evaluation_is_idempotent() {
    let policy = ThresholdPolicy::default();
    let profile = Profile::new("1", 1, present(&[10.0, 20.0, 30.0, 40.0, 50.0]))
        .with_temperature(present(&[14.0, 13.9, 19.5, 13.7, 13.6]))
        .with_salinity(present(&[35.0, 35.0, 34.9, 35.0, 35.0]));

    let first = evaluate_profile(&profile, &policy).unwrap();
    let second = evaluate_profile(&profile, &policy).unwrap();

    assert_eq!(first.report, second.report);
    assert_eq!(first.cleaned, second.cleaned);
}

#[test]
fn test_range_bad_beats_spike_probably_bad() {
    // Value 41 is out of range and also a spike against its neighbours
    let profile = create_temperature_profile(
        &[30.0, 30.0, 41.0, 30.0, 30.0],
        &[10.0, 20.0, 30.0, 40.0, 50.0],
    );
    let evaluation = evaluate_profile(&profile, &ThresholdPolicy::default()).unwrap();

    assert_eq!(evaluation.report.spike_detections(), 1);
    assert_eq!(
        evaluation.flags.flag(Variable::Temperature, 2),
        Some(QcFlag::Bad)
    );
}

#[test]
fn test_short_profile_always_rejected() {
    // Every point is good, but there are only three of them
    let profile = create_temperature_profile(&[10.0, 10.0, 10.0], &[10.0, 20.0, 30.0]);
    let report = evaluate_profile(&profile, &ThresholdPolicy::default())
        .unwrap()
        .report;

    assert_eq!(report.good_data_percentage(), 100.0);
    assert_eq!(report.metadata()["graded_quality"], "excellent");
    assert!(report.is_rejected());
    assert_eq!(report.data_quality(), DataQuality::Unusable);
}

#[test]
fn test_low_good_percentage_rejected() {
    let profile = create_temperature_profile(
        &[50.0, 50.0, 50.0, 10.0, 10.0],
        &[10.0, 20.0, 30.0, 40.0, 50.0],
    );
    let report = evaluate_profile(&profile, &ThresholdPolicy::default())
        .unwrap()
        .report;

    assert_eq!(report.good_data_percentage(), 40.0);
    assert!(report.is_rejected());
    assert!(report.has_issue(crate::constants::issues::INSUFFICIENT_GOOD_DATA));
    assert_eq!(report.data_quality(), DataQuality::Unusable);
}

#[test]
fn test_mismatched_lengths_are_malformed() {
    let controller = QualityController::default();
    let profile = Profile::new("1", 1, present(&[10.0, 20.0, 30.0]))
        .with_temperature(present(&[10.0, 10.0]));

    let error = controller.clean_profile_data(&profile).unwrap_err();
    assert!(matches!(error, QcError::MalformedProfile { .. }));
    assert!(error.is_structural());
    assert_eq!(controller.snapshot().total_profiles, 0);
}

#[test]
fn test_decreasing_pressure_is_malformed() {
    let controller = QualityController::default();
    let profile = create_temperature_profile(&[10.0, 10.0, 10.0], &[10.0, 30.0, 20.0]);

    assert!(matches!(
        controller.clean_profile_data(&profile),
        Err(QcError::MalformedProfile { .. })
    ));
    assert_eq!(controller.snapshot().total_profiles, 0);
}

#[test]
fn test_fill_values_treated_as_missing() {
    let profile = Profile::new("1", 1, present(&[10.0, 20.0, 30.0, 40.0, 50.0]))
        .with_temperature(vec![
            Some(10.0),
            Some(ARGO_FILL_VALUE),
            Some(9.9),
            Some(f64::NAN),
            Some(9.8),
        ]);
    let evaluation = evaluate_profile(&profile, &ThresholdPolicy::default()).unwrap();

    assert_eq!(evaluation.report.total_measurements(), 3);
    assert_eq!(evaluation.cleaned.temperature[1], None);
    assert_eq!(evaluation.cleaned.temperature[3], None);
    assert_eq!(evaluation.cleaned.salinity.len(), 5);
}

#[test]
fn test_metadata_records_thresholds_used() {
    let report = evaluate_profile(&create_good_profile(), &ThresholdPolicy::default())
        .unwrap()
        .report;

    let thresholds = &report.metadata()["thresholds"];
    assert_eq!(thresholds["max_depth_gap"], 500.0);
    assert_eq!(thresholds["limits"]["TEMP"]["max"], 40.0);
    assert_eq!(report.metadata()["detector_order"][0], "range");
}

#[test]
fn test_injected_statistics_are_shared() {
    let statistics = Arc::new(RunStatistics::new());
    let first = QualityController::default().with_statistics(Arc::clone(&statistics));
    let second = QualityController::default().with_statistics(Arc::clone(&statistics));

    first.clean_profile_data(&create_good_profile()).unwrap();
    second.clean_profile_data(&create_good_profile()).unwrap();

    assert_eq!(statistics.snapshot().total_profiles, 2);
}

#[test]
fn test_separate_controllers_have_isolated_statistics() {
    let first = QualityController::default();
    let second = QualityController::default();

    first.clean_profile_data(&create_good_profile()).unwrap();

    assert_eq!(first.snapshot().total_profiles, 1);
    assert_eq!(second.snapshot().total_profiles, 0);
}
