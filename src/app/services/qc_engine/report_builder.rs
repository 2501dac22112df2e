//! Assembly of per-profile QC reports

use crate::app::models::{DataQuality, QcFlag, QcReport};
use std::collections::BTreeMap;

/// Builder for [`QcReport`]
///
/// The report itself has no setters; everything is collected here and
/// frozen by [`QcReportBuilder::build`].
#[derive(Debug, Clone)]
pub struct QcReportBuilder {
    report: QcReport,
}

impl QcReportBuilder {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            report: QcReport {
                profile_id: profile_id.into(),
                total_measurements: 0,
                good_data_percentage: 0.0,
                flags_summary: BTreeMap::new(),
                outliers_removed: 0,
                spike_detections: 0,
                gradient_anomalies: 0,
                density_inversions: 0,
                data_quality: DataQuality::Unusable,
                rejected: false,
                issues: Vec::new(),
                metadata: BTreeMap::new(),
            },
        }
    }

    pub fn total_measurements(mut self, total: usize) -> Self {
        self.report.total_measurements = total;
        self
    }

    pub fn good_data_percentage(mut self, percentage: f64) -> Self {
        self.report.good_data_percentage = percentage;
        self
    }

    pub fn flags_summary(mut self, summary: BTreeMap<QcFlag, usize>) -> Self {
        self.report.flags_summary = summary;
        self
    }

    pub fn outliers_removed(mut self, count: usize) -> Self {
        self.report.outliers_removed = count;
        self
    }

    pub fn spike_detections(mut self, count: usize) -> Self {
        self.report.spike_detections = count;
        self
    }

    pub fn gradient_anomalies(mut self, count: usize) -> Self {
        self.report.gradient_anomalies = count;
        self
    }

    pub fn density_inversions(mut self, count: usize) -> Self {
        self.report.density_inversions = count;
        self
    }

    pub fn data_quality(mut self, quality: DataQuality) -> Self {
        self.report.data_quality = quality;
        self
    }

    /// Mark the profile rejected; classification becomes unusable
    pub fn reject(mut self, reason: impl Into<String>) -> Self {
        self.report.rejected = true;
        self.report.issues.push(reason.into());
        self
    }

    pub fn issues(mut self, issues: impl IntoIterator<Item = String>) -> Self {
        self.report.issues.extend(issues);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.report.metadata.insert(key.into(), value);
        self
    }

    pub fn metadata_entries(
        mut self,
        entries: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> Self {
        self.report.metadata.extend(entries);
        self
    }

    pub fn build(mut self) -> QcReport {
        if self.report.rejected {
            self.report.data_quality = DataQuality::Unusable;
        }
        self.report
    }
}
