//! Per-profile QC report
//!
//! The report is created once by the QC engine and handed to the caller.
//! Fields are read through accessors so a returned report cannot be altered.

use super::{DataQuality, QcFlag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured result of running the QC battery over one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcReport {
    pub(crate) profile_id: String,
    pub(crate) total_measurements: usize,
    pub(crate) good_data_percentage: f64,
    pub(crate) flags_summary: BTreeMap<QcFlag, usize>,
    pub(crate) outliers_removed: usize,
    pub(crate) spike_detections: usize,
    pub(crate) gradient_anomalies: usize,
    pub(crate) density_inversions: usize,
    pub(crate) data_quality: DataQuality,
    pub(crate) rejected: bool,
    pub(crate) issues: Vec<String>,
    pub(crate) metadata: BTreeMap<String, serde_json::Value>,
}

impl QcReport {
    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// Number of present measurements that received a final flag
    pub fn total_measurements(&self) -> usize {
        self.total_measurements
    }

    pub fn good_data_percentage(&self) -> f64 {
        self.good_data_percentage
    }

    /// Final flag counts; sums to `total_measurements`
    pub fn flags_summary(&self) -> &BTreeMap<QcFlag, usize> {
        &self.flags_summary
    }

    /// Count for a single flag, zero when absent
    pub fn flag_count(&self, flag: QcFlag) -> usize {
        self.flags_summary.get(&flag).copied().unwrap_or(0)
    }

    /// Measurements masked in the cleaned profile
    pub fn outliers_removed(&self) -> usize {
        self.outliers_removed
    }

    pub fn spike_detections(&self) -> usize {
        self.spike_detections
    }

    pub fn gradient_anomalies(&self) -> usize {
        self.gradient_anomalies
    }

    pub fn density_inversions(&self) -> usize {
        self.density_inversions
    }

    pub fn data_quality(&self) -> DataQuality {
        self.data_quality
    }

    /// Advisory rejection; the report is complete either way
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// True if any issue starts with the given finding
    pub fn has_issue(&self, finding: &str) -> bool {
        self.issues.iter().any(|issue| issue.starts_with(finding))
    }

    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "{}: {} measurements, {:.1}% good, {} ({} outliers, {} spikes, {} gradients, {} inversions){}",
            self.profile_id,
            self.total_measurements,
            self.good_data_percentage,
            self.data_quality,
            self.outliers_removed,
            self.spike_detections,
            self.gradient_anomalies,
            self.density_inversions,
            if self.rejected { " [rejected]" } else { "" }
        )
    }
}
