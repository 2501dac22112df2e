//! QC entry point
//!
//! [`QualityController`] ties the threshold policy, the detector battery and
//! the run statistics together. The controller is `Send + Sync`; share it
//! behind an `Arc` and call [`QualityController::clean_profile_data`] from as
//! many worker threads as needed.

use crate::app::models::{Profile, QcReport};
use crate::constants::issues;
use crate::error::Result;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use super::detectors::{self, DetectorKind};
use super::flags::{FlagMatrix, clean_profile};
use super::report_builder::QcReportBuilder;
use super::stats::{ProfileOutcome, RunStatistics, StatisticsSnapshot};
use super::thresholds::{ThresholdConfig, ThresholdPolicy};

/// Everything produced by one QC pass, before statistics are touched
#[derive(Debug, Clone)]
pub struct QcEvaluation {
    pub cleaned: Profile,
    pub report: QcReport,
    pub flags: FlagMatrix,
}

impl QcEvaluation {
    /// Contribution of this pass to the run statistics
    pub fn outcome(&self) -> ProfileOutcome {
        ProfileOutcome {
            rejected: self.report.is_rejected(),
            outliers: self.report.outliers_removed(),
            spikes: self.report.spike_detections(),
            gradient_anomalies: self.report.gradient_anomalies(),
            density_inversions: self.report.density_inversions(),
        }
    }
}

/// Run the full QC battery over one profile without recording statistics
///
/// Fill values are normalised to missing first, then the structural
/// invariants are checked. A structural failure is the only error.
pub fn evaluate_profile(profile: &Profile, policy: &ThresholdPolicy) -> Result<QcEvaluation> {
    let mut working = profile.clone();
    working.normalize_missing();
    working.validate_structure()?;

    let mut flags = FlagMatrix::new(&working);
    let mut builder = QcReportBuilder::new(working.profile_id());

    for (kind, outcome) in detectors::run_all(&working, policy) {
        flags.apply_all(&outcome.assignments);
        builder = match kind {
            DetectorKind::Spike => builder.spike_detections(outcome.count),
            DetectorKind::Gradient => builder.gradient_anomalies(outcome.count),
            DetectorKind::DensityInversion => builder.density_inversions(outcome.count),
            DetectorKind::Range | DetectorKind::DepthGap => builder,
        };
        builder = builder
            .issues(outcome.issues)
            .metadata_entries(outcome.metadata);
    }

    flags.finalize();
    let summary = flags.summarize();
    let percentage = summary.good_data_percentage();
    let graded = summary.classify();

    builder = builder
        .total_measurements(summary.total)
        .good_data_percentage(percentage)
        .outliers_removed(summary.masked)
        .data_quality(graded)
        .metadata("graded_quality", json!(graded.as_str()))
        .metadata(
            "detector_order",
            json!(DetectorKind::ORDER.map(DetectorKind::name)),
        )
        .metadata("thresholds", threshold_metadata(policy))
        .flags_summary(summary.counts);

    if summary.total < policy.min_profile_length() {
        builder = builder.reject(format!(
            "{}: {} present, {} required",
            issues::INSUFFICIENT_LENGTH,
            summary.total,
            policy.min_profile_length()
        ));
    }
    if percentage < policy.min_good_data_percentage() {
        builder = builder.reject(format!(
            "{}: {:.1}% good, {:.1}% required",
            issues::INSUFFICIENT_GOOD_DATA,
            percentage,
            policy.min_good_data_percentage()
        ));
    }

    let report = builder.build();
    let cleaned = clean_profile(&working, &flags);

    debug!("{}", report.summary());

    Ok(QcEvaluation {
        cleaned,
        report,
        flags,
    })
}

fn threshold_metadata(policy: &ThresholdPolicy) -> serde_json::Value {
    let limits: serde_json::Map<String, serde_json::Value> = policy
        .variables()
        .map(|(code, limits)| {
            (
                code.to_string(),
                json!({
                    "min": limits.min,
                    "max": limits.max,
                    "spike_threshold": limits.spike_threshold,
                    "gradient_threshold": limits.gradient_threshold,
                }),
            )
        })
        .collect();

    json!({
        "limits": limits,
        "density_inversion_threshold": policy.density_inversion_threshold(),
        "min_good_data_percentage": policy.min_good_data_percentage(),
        "max_depth_gap": policy.max_depth_gap(),
        "min_profile_length": policy.min_profile_length(),
    })
}

/// Quality controller for Argo profiles
#[derive(Debug)]
pub struct QualityController {
    policy: Arc<ThresholdPolicy>,
    statistics: Arc<RunStatistics>,
}

impl Default for QualityController {
    fn default() -> Self {
        Self::new(ThresholdPolicy::default())
    }
}

impl QualityController {
    /// Create a controller with fresh statistics
    pub fn new(policy: ThresholdPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
            statistics: Arc::new(RunStatistics::new()),
        }
    }

    /// Create a controller from a threshold configuration mapping
    pub fn from_config(config: &ThresholdConfig) -> Result<Self> {
        Ok(Self::new(ThresholdPolicy::from_config(config)?))
    }

    /// Use an externally owned statistics aggregator
    pub fn with_statistics(mut self, statistics: Arc<RunStatistics>) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    pub fn statistics(&self) -> &Arc<RunStatistics> {
        &self.statistics
    }

    /// Snapshot of the run statistics
    pub fn snapshot(&self) -> StatisticsSnapshot {
        self.statistics.snapshot()
    }

    /// Quality control one profile
    ///
    /// Returns the cleaned profile and its report. Rejection is advisory and
    /// still yields a complete report. A malformed profile fails without
    /// touching the run statistics; every other call records exactly once.
    pub fn clean_profile_data(&self, profile: &Profile) -> Result<(Profile, QcReport)> {
        let evaluation = evaluate_profile(profile, &self.policy).inspect_err(|error| {
            warn!("Skipping profile {}: {}", profile.profile_id(), error);
        })?;

        self.statistics.record(&evaluation.outcome());
        Ok((evaluation.cleaned, evaluation.report))
    }
}
