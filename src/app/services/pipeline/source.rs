//! Local profile documents
//!
//! Profiles arrive already decoded from the scientific array files; this
//! module only reads the crate's own JSON rendition of [`Profile`] records,
//! either a single object or an array of them per file.

use crate::app::models::Profile;
use crate::error::{QcError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileDocument {
    Many(Vec<Profile>),
    One(Box<Profile>),
}

/// Find profile documents under `input`
///
/// A file path is returned as-is; a directory is searched with the glob
/// `pattern` relative to it. Results are sorted for a stable run order.
pub fn discover_profile_files(input: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(QcError::processing_failed(input, "input path does not exist"));
    }

    let full_pattern = input.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();
    debug!("Searching for profile documents with pattern: {}", pattern_str);

    let entries = glob::glob(&pattern_str).map_err(|e| {
        QcError::configuration(format!("invalid profile pattern '{}': {}", pattern, e))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                None
            }
        })
        .collect();
    files.sort();

    debug!("Found {} profile documents", files.len());
    Ok(files)
}

/// Read every profile from one JSON document
///
/// A temperature or salinity array that is left out or written as `[]` is
/// read as all-missing at every pressure level.
pub fn load_profiles(path: &Path) -> Result<Vec<Profile>> {
    let contents = fs::read_to_string(path)?;
    let document: ProfileDocument = serde_json::from_str(&contents)
        .map_err(|e| QcError::processing_failed(path, format!("invalid profile JSON: {}", e)))?;

    let mut profiles = match document {
        ProfileDocument::Many(profiles) => profiles,
        ProfileDocument::One(profile) => vec![*profile],
    };
    for profile in &mut profiles {
        profile.expand_absent_measurements();
    }
    Ok(profiles)
}

/// Profiles loaded from many documents plus the documents that failed
#[derive(Debug, Default)]
pub struct LoadedProfiles {
    pub profiles: Vec<Profile>,
    pub failures: Vec<(PathBuf, QcError)>,
}

/// Load all documents, collecting per-file failures instead of aborting
pub fn load_all(paths: &[PathBuf]) -> LoadedProfiles {
    let mut loaded = LoadedProfiles::default();
    for path in paths {
        match load_profiles(path) {
            Ok(profiles) => {
                debug!("Loaded {} profiles from {}", profiles.len(), path.display());
                loaded.profiles.extend(profiles);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
                loaded.failures.push((path.clone(), e));
            }
        }
    }
    loaded
}
