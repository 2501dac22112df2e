//! End-of-run console report

use crate::app::services::qc_engine::StatisticsSnapshot;
use chrono::{DateTime, Local};
use colored::*;
use std::fmt;

use super::orchestrator::BatchSummary;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Final run report, rendered through [`fmt::Display`]
pub struct FinalReport<'a> {
    snapshot: &'a StatisticsSnapshot,
    summary: &'a BatchSummary,
    started: DateTime<Local>,
    finished: DateTime<Local>,
}

impl<'a> FinalReport<'a> {
    pub fn new(
        snapshot: &'a StatisticsSnapshot,
        summary: &'a BatchSummary,
        started: DateTime<Local>,
        finished: DateTime<Local>,
    ) -> Self {
        Self {
            snapshot,
            summary,
            started,
            finished,
        }
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, label: ColoredString, value: ColoredString) -> fmt::Result {
    writeln!(f, "  {} {}", label, value)
}

impl fmt::Display for FinalReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        let snapshot = self.snapshot;

        writeln!(f, "\n{}", "Quality Control Summary".bright_green().bold())?;
        write_line(
            f,
            "Started:".bright_cyan(),
            self.started.format(TIMESTAMP_FORMAT).to_string().normal(),
        )?;
        write_line(
            f,
            "Finished:".bright_cyan(),
            self.finished.format(TIMESTAMP_FORMAT).to_string().normal(),
        )?;
        write_line(
            f,
            "Time elapsed:".bright_cyan(),
            format!("{}ms", summary.elapsed_ms).bright_white(),
        )?;
        if summary.unreadable_documents > 0 {
            write_line(
                f,
                "Documents unreadable:".bright_red(),
                summary.unreadable_documents.to_string().bright_red().bold(),
            )?;
        }
        write_line(
            f,
            "Profiles submitted:".bright_cyan(),
            summary.submitted.to_string().bright_white(),
        )?;
        write_line(
            f,
            "Profiles accepted:".bright_cyan(),
            summary.accepted.to_string().bright_white().bold(),
        )?;
        write_line(
            f,
            "Profiles rejected:".bright_cyan(),
            summary.rejected.to_string().bright_yellow(),
        )?;
        if summary.malformed > 0 {
            write_line(
                f,
                "Profiles malformed:".bright_red(),
                summary.malformed.to_string().bright_red().bold(),
            )?;
        }
        if summary.failed > 0 {
            write_line(
                f,
                "Profiles failed:".bright_red(),
                summary.failed.to_string().bright_red().bold(),
            )?;
        }
        if summary.skipped > 0 {
            write_line(
                f,
                "Profiles skipped:".bright_yellow(),
                summary.skipped.to_string().bright_yellow().bold(),
            )?;
        }

        writeln!(f, "\n{}", "Detections".bright_green().bold())?;
        for (label, count) in [
            ("Outliers removed:", snapshot.outliers_detected),
            ("Spikes:", snapshot.spikes_detected),
            ("Gradient anomalies:", snapshot.gradient_anomalies_detected),
            ("Density inversions:", snapshot.density_inversions_detected),
        ] {
            write_line(f, label.bright_cyan(), count.to_string().bright_white())?;
        }
        write_line(
            f,
            "Success rate:".bright_cyan(),
            format!("{:.1}%", snapshot.success_rate_percent).normal(),
        )
    }
}

/// Render the final run report as coloured multi-line text
pub fn render_final_report(
    snapshot: &StatisticsSnapshot,
    summary: &BatchSummary,
    started: DateTime<Local>,
) -> String {
    FinalReport::new(snapshot, summary, started, Local::now()).to_string()
}
