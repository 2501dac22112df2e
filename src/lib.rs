//! Argo Profile Quality Control Library
//!
//! A Rust library for quality controlling temperature and salinity profiles
//! measured by Argo profiling floats.
//!
//! This library provides tools for:
//! - Assigning Argo QC flags (0-9) to every measurement of a profile
//! - Range, spike, gradient, density-inversion and depth-gap detection
//! - Per-profile QC reports with data quality classification
//! - Thread-safe run statistics shared across worker threads
//! - A bounded-parallel batch pipeline with pluggable result sinks

pub mod config;
pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod pipeline;
        pub mod qc_engine;
        pub mod seawater;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod logging;
}

// Re-export commonly used types
pub use app::models::{DataQuality, Profile, QcFlag, QcReport, Variable};
pub use app::services::qc_engine::{QualityController, StatisticsSnapshot, ThresholdPolicy};
pub use config::PipelineConfig;
pub use error::{QcError, Result};
