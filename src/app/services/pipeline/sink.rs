//! Downstream hand-off of QC results
//!
//! A sink receives every `(cleaned_profile, report)` pair the pipeline
//! produces, rejected profiles included. Sinks are called from worker
//! threads and must serialise their own writes.

use crate::app::models::{Profile, QcReport};
use crate::constants::{PROFILES_OUTPUT_FILE, REPORTS_OUTPUT_FILE};
use crate::error::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Destination for QC results
pub trait ProfileSink: Send + Sync {
    /// Store one cleaned profile and its report
    fn store(&self, cleaned: &Profile, report: &QcReport) -> Result<()>;

    /// Flush buffered output
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Keeps every result in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Profile, QcReport)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the stored results
    pub fn records(&self) -> Vec<(Profile, QcReport)> {
        lock(&self.records).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Report for a profile id, if stored
    pub fn report_for(&self, profile_id: &str) -> Option<QcReport> {
        lock(&self.records)
            .iter()
            .find(|(_, report)| report.profile_id() == profile_id)
            .map(|(_, report)| report.clone())
    }
}

impl ProfileSink for MemorySink {
    fn store(&self, cleaned: &Profile, report: &QcReport) -> Result<()> {
        lock(&self.records).push((cleaned.clone(), report.clone()));
        Ok(())
    }
}

/// Cleaned profile row keyed by its profile id
#[derive(Serialize)]
struct ProfileRecord<'a> {
    profile_id: String,
    profile: &'a Profile,
}

/// Writes JSON Lines files: one for cleaned profiles, one for QC reports
#[derive(Debug)]
pub struct JsonLinesSink {
    directory: PathBuf,
    profiles: Mutex<BufWriter<File>>,
    reports: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    /// Create the output directory and truncate both output files
    pub fn create(directory: &Path) -> Result<Self> {
        fs::create_dir_all(directory)?;
        let profiles = File::create(directory.join(PROFILES_OUTPUT_FILE))?;
        let reports = File::create(directory.join(REPORTS_OUTPUT_FILE))?;
        debug!("Writing QC results to {}", directory.display());

        Ok(Self {
            directory: directory.to_path_buf(),
            profiles: Mutex::new(BufWriter::new(profiles)),
            reports: Mutex::new(BufWriter::new(reports)),
        })
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.directory.join(PROFILES_OUTPUT_FILE)
    }

    pub fn reports_path(&self) -> PathBuf {
        self.directory.join(REPORTS_OUTPUT_FILE)
    }
}

impl ProfileSink for JsonLinesSink {
    fn store(&self, cleaned: &Profile, report: &QcReport) -> Result<()> {
        let record = ProfileRecord {
            profile_id: cleaned.profile_id(),
            profile: cleaned,
        };
        let profile_line = serde_json::to_string(&record)?;
        let report_line = serde_json::to_string(report)?;

        writeln!(lock(&self.profiles), "{}", profile_line)?;
        writeln!(lock(&self.reports), "{}", report_line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        lock(&self.profiles).flush()?;
        lock(&self.reports).flush()?;
        Ok(())
    }
}

/// Drops every result; used when only the run summary is wanted
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl ProfileSink for DiscardSink {
    fn store(&self, _cleaned: &Profile, _report: &QcReport) -> Result<()> {
        Ok(())
    }
}
