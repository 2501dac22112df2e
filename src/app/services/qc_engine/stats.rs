//! Run-wide QC statistics
//!
//! Counters are shared by every worker that calls the engine. All updates
//! for one profile happen inside a single critical section, and readers only
//! ever receive a point-in-time copy.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// What one QC pass contributes to the run statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileOutcome {
    pub rejected: bool,
    pub outliers: usize,
    pub spikes: usize,
    pub gradient_anomalies: usize,
    pub density_inversions: usize,
}

/// Raw counters guarded by the statistics mutex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counters {
    total_profiles: u64,
    profiles_processed: u64,
    profiles_rejected: u64,
    profiles_malformed: u64,
    outliers_detected: u64,
    spikes_detected: u64,
    gradient_anomalies_detected: u64,
    density_inversions_detected: u64,
}

/// Thread-safe aggregator owned by a QC controller
#[derive(Debug, Default)]
pub struct RunStatistics {
    counters: Mutex<Counters>,
}

impl RunStatistics {
    /// Create an aggregator with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        // Plain integers: a poisoned lock still holds valid counts.
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record one fully processed profile
    pub fn record(&self, outcome: &ProfileOutcome) {
        let mut counters = self.lock();
        counters.total_profiles += 1;
        if outcome.rejected {
            counters.profiles_rejected += 1;
        } else {
            counters.profiles_processed += 1;
        }
        counters.outliers_detected += outcome.outliers as u64;
        counters.spikes_detected += outcome.spikes as u64;
        counters.gradient_anomalies_detected += outcome.gradient_anomalies as u64;
        counters.density_inversions_detected += outcome.density_inversions as u64;
    }

    /// Record a profile that failed the structural checks
    ///
    /// Kept apart from `total_profiles` so the success rate only reflects
    /// profiles that went through QC.
    pub fn record_malformed(&self) {
        self.lock().profiles_malformed += 1;
    }

    /// Consistent copy of the current counters
    pub fn snapshot(&self) -> StatisticsSnapshot {
        let counters = *self.lock();
        StatisticsSnapshot {
            total_profiles: counters.total_profiles,
            profiles_processed: counters.profiles_processed,
            profiles_rejected: counters.profiles_rejected,
            profiles_malformed: counters.profiles_malformed,
            outliers_detected: counters.outliers_detected,
            spikes_detected: counters.spikes_detected,
            gradient_anomalies_detected: counters.gradient_anomalies_detected,
            density_inversions_detected: counters.density_inversions_detected,
            success_rate_percent: if counters.total_profiles == 0 {
                0.0
            } else {
                (counters.profiles_processed as f64 / counters.total_profiles as f64) * 100.0
            },
        }
    }
}

/// Point-in-time view of the run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub total_profiles: u64,
    pub profiles_processed: u64,
    pub profiles_rejected: u64,
    pub profiles_malformed: u64,
    pub outliers_detected: u64,
    pub spikes_detected: u64,
    pub gradient_anomalies_detected: u64,
    pub density_inversions_detected: u64,
    pub success_rate_percent: f64,
}

impl StatisticsSnapshot {
    /// Get summary of run statistics
    pub fn summary(&self) -> String {
        format!(
            "QC Summary: {} profiles ({:.1}% accepted) | \
             Rejected: {} | Malformed: {} | Outliers: {} | Spikes: {} | \
             Gradient anomalies: {} | Density inversions: {}",
            self.total_profiles,
            self.success_rate_percent,
            self.profiles_rejected,
            self.profiles_malformed,
            self.outliers_detected,
            self.spikes_detected,
            self.gradient_anomalies_detected,
            self.density_inversions_detected
        )
    }
}
