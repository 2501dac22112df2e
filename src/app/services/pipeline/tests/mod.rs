//! Tests for the batch pipeline: sources, sinks and the orchestrator

mod report_tests;
mod source_tests;

use crate::app::models::{Profile, QcReport};
use crate::app::services::pipeline::sink::ProfileSink;
use crate::error::{QcError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

pub use crate::app::services::qc_engine::tests::{
    create_all_missing_profile, create_good_profile, create_temperature_profile, present,
};

/// Profile that fails structural validation
pub fn create_malformed_profile() -> Profile {
    Profile::new("7900001", 1, present(&[10.0, 20.0, 30.0])).with_temperature(present(&[10.0]))
}

/// Good profile with a distinct cycle number
pub fn create_good_profile_cycle(cycle_number: i32) -> Profile {
    Profile {
        cycle_number,
        ..create_good_profile()
    }
}

/// Write a JSON document into `dir`
pub fn write_document(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

/// Sink that refuses every record
#[derive(Debug, Default)]
pub struct FailingSink;

impl ProfileSink for FailingSink {
    fn store(&self, _cleaned: &Profile, _report: &QcReport) -> Result<()> {
        Err(QcError::configuration("sink unavailable"))
    }
}
