//! Error handling for profile quality control operations.
//!
//! Separates structural failures that abort QC for a single profile from
//! configuration and I/O failures of the surrounding pipeline. Quality
//! rejection is not an error and never appears here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QcError {
    #[error("Malformed profile {profile_id}: {reason}")]
    MalformedProfile { profile_id: String, reason: String },

    #[error("Unknown variable: {variable}")]
    UnknownVariable { variable: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Configuration file not found: {}{}", .path.display(), template_hint(.template))]
    ConfigNotFound {
        path: PathBuf,
        template: Option<PathBuf>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Processing failed for {path}: {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

fn template_hint(template: &Option<PathBuf>) -> String {
    match template {
        Some(path) => format!(" (copy {} and update it)", path.display()),
        None => String::new(),
    }
}

impl QcError {
    /// Create a malformed profile error
    pub fn malformed(profile_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedProfile {
            profile_id: profile_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown variable error
    pub fn unknown_variable(variable: impl Into<String>) -> Self {
        Self::UnknownVariable {
            variable: variable.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing failure tied to an input path
    pub fn processing_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ProcessingFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }

    /// True for failures that only affect one profile
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::MalformedProfile { .. })
    }
}

pub type Result<T> = std::result::Result<T, QcError>;
