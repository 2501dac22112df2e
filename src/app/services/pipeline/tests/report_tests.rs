//! Tests for the end-of-run console report

use crate::app::services::pipeline::orchestrator::BatchSummary;
use crate::app::services::pipeline::report::{FinalReport, render_final_report};
use crate::app::services::qc_engine::StatisticsSnapshot;
use chrono::Local;

fn clean_summary() -> BatchSummary {
    BatchSummary {
        submitted: 3,
        accepted: 2,
        rejected: 1,
        elapsed_ms: 12,
        ..BatchSummary::default()
    }
}

#[test]
fn test_report_lists_run_counts() {
    let report = render_final_report(&StatisticsSnapshot::default(), &clean_summary(), Local::now());

    assert!(report.contains("Quality Control Summary"));
    assert!(report.contains("Profiles submitted:"));
    assert!(report.contains("Success rate:"));
    assert!(!report.contains("Profiles malformed:"));
    assert!(!report.contains("Documents unreadable:"));
}

#[test]
fn test_report_shows_unreadable_documents() {
    let summary = clean_summary().with_unreadable_documents(4);
    let started = Local::now();
    let report = FinalReport::new(&StatisticsSnapshot::default(), &summary, started, started).to_string();

    let line = report
        .lines()
        .find(|line| line.contains("Documents unreadable:"))
        .unwrap();
    assert!(line.contains('4'));
}
