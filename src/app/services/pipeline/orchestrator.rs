//! Bounded-parallel batch runner
//!
//! Profiles are quality controlled on blocking threads with at most
//! `workers` in flight. Each result is handed to the sink as soon as it is
//! ready, so output order follows completion order, not input order.

use crate::app::models::Profile;
use crate::app::services::qc_engine::QualityController;
use crate::error::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::sink::ProfileSink;

/// Counts for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Profiles handed to the pipeline
    pub submitted: usize,
    /// Profiles that passed QC and reached the sink
    pub accepted: usize,
    /// Profiles rejected by QC; these still reach the sink
    pub rejected: usize,
    /// Profiles that failed structural validation
    pub malformed: usize,
    /// Profiles lost to sink or worker failures
    pub failed: usize,
    /// Profiles never started because the run was cancelled
    pub skipped: usize,
    /// Profile documents that could not be read before the run
    #[serde(default)]
    pub unreadable_documents: usize,
    pub elapsed_ms: u64,
}

impl BatchSummary {
    /// Profiles that went through QC
    pub fn evaluated(&self) -> usize {
        self.accepted + self.rejected
    }

    /// Attach the number of documents the loader gave up on
    pub fn with_unreadable_documents(mut self, count: usize) -> Self {
        self.unreadable_documents = count;
        self
    }

    fn record(mut self, result: ProfileResult) -> Self {
        match result {
            ProfileResult::Accepted => self.accepted += 1,
            ProfileResult::Rejected => self.rejected += 1,
            ProfileResult::Malformed => self.malformed += 1,
            ProfileResult::Failed => self.failed += 1,
            ProfileResult::Skipped => self.skipped += 1,
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileResult {
    Accepted,
    Rejected,
    Malformed,
    Failed,
    Skipped,
}

/// Runs a [`QualityController`] over a batch of profiles
#[derive(Debug, Clone)]
pub struct ProfilePipeline {
    controller: Arc<QualityController>,
    workers: usize,
    show_progress: bool,
}

impl ProfilePipeline {
    /// Create a pipeline; zero workers means one per CPU
    pub fn new(controller: Arc<QualityController>, workers: usize) -> Self {
        let workers = if workers == 0 { num_cpus::get() } else { workers };
        Self {
            controller,
            workers,
            show_progress: false,
        }
    }

    /// Show an indicatif progress bar while running
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn controller(&self) -> &Arc<QualityController> {
        &self.controller
    }

    /// Quality control every profile and deliver results to `sink`
    ///
    /// Malformed profiles and sink failures are counted, never fatal.
    /// Cancelling `cancel` stops new profiles from starting; profiles
    /// already on a worker finish and are delivered. Only a failing final
    /// flush of the sink is returned as an error.
    pub async fn run(
        &self,
        profiles: Vec<Profile>,
        sink: Arc<dyn ProfileSink>,
        cancel: CancellationToken,
    ) -> Result<BatchSummary> {
        let start_time = Instant::now();
        let submitted = profiles.len();
        let concurrent_limit = self.workers.min(submitted).max(1);

        info!(
            "Quality controlling {} profiles with {} workers",
            submitted, concurrent_limit
        );

        let pb = self.progress_bar(submitted as u64);
        let pb_clone = pb.clone();

        let summary = stream::iter(profiles)
            .map(|profile| {
                let controller = Arc::clone(&self.controller);
                let sink = Arc::clone(&sink);
                let cancel = cancel.clone();
                let pb = pb_clone.clone();
                async move {
                    if cancel.is_cancelled() {
                        return ProfileResult::Skipped;
                    }

                    let profile_id = profile.profile_id();
                    pb.set_message(format!("Profile {}", profile_id));

                    let joined = task::spawn_blocking(move || {
                        process_profile(&controller, sink.as_ref(), &profile)
                    })
                    .await;
                    pb.inc(1);

                    joined.unwrap_or_else(|e| {
                        error!("Worker for profile {} panicked: {}", profile_id, e);
                        ProfileResult::Failed
                    })
                }
            })
            .buffer_unordered(concurrent_limit)
            .fold(
                BatchSummary {
                    submitted,
                    ..BatchSummary::default()
                },
                |summary, result| async move { summary.record(result) },
            )
            .await;

        sink.flush()?;

        let summary = BatchSummary {
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            ..summary
        };

        if summary.skipped > 0 {
            pb.abandon_with_message(format!("Cancelled, {} profiles skipped", summary.skipped));
            warn!(
                "Run cancelled: {} of {} profiles skipped",
                summary.skipped, submitted
            );
        } else {
            pb.finish_with_message("Quality control complete");
        }

        debug!("Batch summary: {:?}", summary);
        Ok(summary)
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message("Quality controlling profiles");
        pb
    }
}

fn process_profile(
    controller: &QualityController,
    sink: &dyn ProfileSink,
    profile: &Profile,
) -> ProfileResult {
    match controller.clean_profile_data(profile) {
        Ok((cleaned, report)) => {
            if let Err(e) = sink.store(&cleaned, &report) {
                error!("Failed to store profile {}: {}", report.profile_id(), e);
                return ProfileResult::Failed;
            }
            if report.is_rejected() {
                debug!("Rejected profile {}", report.profile_id());
                ProfileResult::Rejected
            } else {
                ProfileResult::Accepted
            }
        }
        Err(e) if e.is_structural() => {
            controller.statistics().record_malformed();
            ProfileResult::Malformed
        }
        Err(e) => {
            error!("Failed to process profile {}: {}", profile.profile_id(), e);
            ProfileResult::Failed
        }
    }
}
