//! Batch pipeline around the QC engine
//!
//! The QC engine itself is synchronous and handles one profile per call.
//! This module is the caller side: it finds profile documents, runs the
//! engine over them with bounded parallelism, and hands every cleaned
//! profile and report to a [`ProfileSink`].
//!
//! - [`source`] - Profile document discovery and loading
//! - [`orchestrator`] - [`ProfilePipeline`] and its [`BatchSummary`]
//! - [`sink`] - Downstream storage trait with memory and JSON Lines sinks
//! - [`report`] - Console report printed at the end of a run

pub mod orchestrator;
pub mod report;
pub mod sink;
pub mod source;

#[cfg(test)]
pub mod tests;

pub use orchestrator::{BatchSummary, ProfilePipeline};
pub use report::{FinalReport, render_final_report};
pub use sink::{DiscardSink, JsonLinesSink, MemorySink, ProfileSink};
pub use source::{LoadedProfiles, discover_profile_files, load_all, load_profiles};
