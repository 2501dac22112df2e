//! Tests for profile document discovery and loading

use super::*;
use crate::app::services::pipeline::source::{discover_profile_files, load_all, load_profiles};
use tempfile::TempDir;

#[test]
fn test_load_single_profile_document() {
    let temp_dir = TempDir::new().unwrap();
    let profile = create_good_profile();
    let path = write_document(
        temp_dir.path(),
        "single.json",
        &serde_json::to_string(&profile).unwrap(),
    );

    let loaded = load_profiles(&path).unwrap();
    assert_eq!(loaded, vec![profile]);
}

#[test]
fn test_load_profile_array_document() {
    let temp_dir = TempDir::new().unwrap();
    let profiles = vec![create_good_profile_cycle(1), create_good_profile_cycle(2)];
    let path = write_document(
        temp_dir.path(),
        "many.json",
        &serde_json::to_string(&profiles).unwrap(),
    );

    let loaded = load_profiles(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1].profile_id(), "2902746_2");
}

#[test]
fn test_load_document_with_nulls() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_document(
        temp_dir.path(),
        "nulls.json",
        r#"{
            "platform_number": "6901234",
            "cycle_number": 3,
            "latitude": 10.0,
            "longitude": -30.0,
            "temperature": [10.0, null, 9.5],
            "salinity": [],
            "pressure": [5.0, 10.0, 15.0]
        }"#,
    );

    let loaded = load_profiles(&path).unwrap();
    assert_eq!(loaded[0].temperature, vec![Some(10.0), None, Some(9.5)]);
    assert_eq!(loaded[0].salinity, vec![None; 3]);
}

#[test]
fn test_omitted_salinity_reads_as_missing() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_document(
        temp_dir.path(),
        "temp_only.json",
        r#"{
            "platform_number": "6902911",
            "cycle_number": 7,
            "temperature": [10.0, 9.8],
            "pressure": [5.0, 10.0]
        }"#,
    );

    let loaded = load_profiles(&path).unwrap();
    assert_eq!(loaded[0].salinity, vec![None, None]);
    assert!(loaded[0].validate_structure().is_ok());
}

#[test]
fn test_invalid_json_is_processing_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_document(temp_dir.path(), "broken.json", "{ not json");

    let error = load_profiles(&path).unwrap_err();
    assert!(matches!(error, QcError::ProcessingFailed { .. }));
}

#[test]
fn test_discover_files_with_pattern() {
    let temp_dir = TempDir::new().unwrap();
    write_document(temp_dir.path(), "b.json", "[]");
    write_document(temp_dir.path(), "a.json", "[]");
    write_document(temp_dir.path(), "nested/c.json", "[]");
    write_document(temp_dir.path(), "notes.txt", "ignore");

    let files = discover_profile_files(temp_dir.path(), "**/*.json").unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(files.len(), 3);
    assert_eq!(names[0], "a.json");
    assert!(!names.contains(&"notes.txt".to_string()));
}

#[test]
fn test_discover_single_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_document(temp_dir.path(), "only.json", "[]");

    assert_eq!(discover_profile_files(&path, "*.json").unwrap(), vec![path]);
}

#[test]
fn test_discover_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    assert!(discover_profile_files(&missing, "*.json").is_err());
}

#[test]
fn test_load_all_collects_failures() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_document(
        temp_dir.path(),
        "good.json",
        &serde_json::to_string(&vec![create_good_profile()]).unwrap(),
    );
    let bad = write_document(temp_dir.path(), "bad.json", "oops");

    let loaded = load_all(&[good, bad.clone()]);
    assert_eq!(loaded.profiles.len(), 1);
    assert_eq!(loaded.failures.len(), 1);
    assert_eq!(loaded.failures[0].0, bad);
}
