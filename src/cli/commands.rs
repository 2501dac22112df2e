//! Command implementations for the Argo QC CLI
//!
//! This module contains the execution logic for each subcommand: loading
//! configuration, wiring the QC engine into the batch pipeline, and
//! printing results.

use crate::app::services::pipeline::{
    BatchSummary, DiscardSink, JsonLinesSink, ProfilePipeline, ProfileSink,
    discover_profile_files, load_all, render_final_report,
};
use crate::app::services::qc_engine::{QualityController, ThresholdPolicy, VariableLimits};
use crate::cli::args::{Args, CheckConfigArgs, Commands, RunArgs, ThresholdsArgs};
use crate::cli::logging::setup_logging;
use crate::config::PipelineConfig;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::error::{QcError, Result};
use chrono::Local;
use colored::*;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Dispatch to the selected subcommand
pub async fn run(args: Args, cancel: CancellationToken) -> Result<()> {
    match args.command {
        Some(Commands::Run(run_args)) => run_quality_control(run_args, cancel).await.map(|_| ()),
        Some(Commands::Thresholds(thresholds_args)) => show_thresholds(&thresholds_args),
        Some(Commands::CheckConfig(check_args)) => check_config(&check_args),
        None => Err(QcError::configuration("no subcommand given")),
    }
}

/// Load the run configuration
///
/// The default config path may be absent, in which case built-in defaults
/// apply. An explicitly named file must exist.
fn load_run_config(path: &Path) -> Result<PipelineConfig> {
    match PipelineConfig::load(path) {
        Err(QcError::ConfigNotFound { .. }) if path == Path::new(DEFAULT_CONFIG_PATH) => {
            Ok(PipelineConfig::default())
        }
        other => other,
    }
}

/// Quality control every profile under `--input`
pub async fn run_quality_control(args: RunArgs, cancel: CancellationToken) -> Result<BatchSummary> {
    let started = Local::now();

    let mut config = load_run_config(&args.config)?;
    if let Some(workers) = args.workers {
        let workers = if workers == 0 { num_cpus::get() } else { workers };
        config = config.with_max_workers(workers);
    }
    let show_progress = config.processing.show_progress && args.show_progress();
    config = config.with_progress(show_progress);
    config.validate()?;

    setup_logging(
        &args.get_log_level(&config.logging.level),
        args.quiet,
        config.logging.json,
    );
    info!("Using configuration from {}", args.config.display());

    let files = discover_profile_files(&args.input, &args.pattern)?;
    if files.is_empty() {
        warn!("No profile documents found under {}", args.input.display());
    }
    let loaded = load_all(&files);
    let unreadable_documents = loaded.failures.len();
    if unreadable_documents > 0 {
        warn!("{} profile documents could not be read", unreadable_documents);
    }

    let controller = Arc::new(QualityController::new(config.threshold_policy()?));
    let pipeline = ProfilePipeline::new(Arc::clone(&controller), config.processing.max_workers)
        .with_progress(config.processing.show_progress);

    let sink: Arc<dyn ProfileSink> = match &args.output {
        Some(directory) => Arc::new(JsonLinesSink::create(directory)?),
        None => Arc::new(DiscardSink),
    };

    let summary = pipeline
        .run(loaded.profiles, sink, cancel.clone())
        .await?
        .with_unreadable_documents(unreadable_documents);
    let snapshot = controller.snapshot();
    info!("{}", snapshot.summary());

    if !args.quiet {
        println!("{}", render_final_report(&snapshot, &summary, started));
        if let Some(directory) = &args.output {
            println!(
                "  {} {}",
                "Output:".bright_cyan(),
                directory.display().to_string().bright_white()
            );
        }
    }

    if cancel.is_cancelled() {
        return Err(QcError::interrupted(format!(
            "{} of {} profiles skipped",
            summary.skipped, summary.submitted
        )));
    }

    Ok(summary)
}

/// Print effective thresholds for all or one variable
pub fn show_thresholds(args: &ThresholdsArgs) -> Result<()> {
    let policy = match &args.config {
        Some(path) => PipelineConfig::load(path)?.threshold_policy()?,
        None => ThresholdPolicy::default(),
    };

    if let Some(variable) = &args.variable {
        let limits = policy.limits_for(variable)?;
        print_limits(&variable.to_ascii_uppercase(), limits);
        return Ok(());
    }

    println!("{}", "Variable limits".bright_green().bold());
    for (code, limits) in policy.variables() {
        print_limits(code, limits);
    }

    println!("\n{}", "Profile checks".bright_green().bold());
    println!(
        "  {} {} kg/m³",
        "Density inversion threshold:".bright_cyan(),
        policy.density_inversion_threshold()
    );
    println!(
        "  {} {}%",
        "Minimum good data:".bright_cyan(),
        policy.min_good_data_percentage()
    );
    println!(
        "  {} {} dbar",
        "Maximum depth gap:".bright_cyan(),
        policy.max_depth_gap()
    );
    println!(
        "  {} {}",
        "Minimum profile length:".bright_cyan(),
        policy.min_profile_length()
    );
    Ok(())
}

fn print_limits(code: &str, limits: &VariableLimits) {
    println!(
        "  {} range [{}, {}], spike {}, gradient {}",
        format!("{:<5}", code).bright_yellow().bold(),
        limits.min,
        limits.max,
        limits.spike_threshold,
        limits.gradient_threshold
    );
}

/// Load and validate a configuration file
pub fn check_config(args: &CheckConfigArgs) -> Result<()> {
    let config = PipelineConfig::load(&args.config)?;
    config.validate()?;

    println!(
        "{} {}",
        "Configuration OK:".bright_green().bold(),
        args.config.display()
    );
    println!(
        "  {} {}",
        "Workers:".bright_cyan(),
        config.processing.max_workers
    );
    println!("  {} {}", "Log level:".bright_cyan(), config.logging.level);
    Ok(())
}
