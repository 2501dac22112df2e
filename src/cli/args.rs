//! Command-line argument definitions for the Argo QC tool
//!
//! This module defines the CLI interface using the clap derive API.

use crate::constants::{DEFAULT_CONFIG_PATH, DEFAULT_PROFILE_PATTERN};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the Argo profile quality-control tool
#[derive(Debug, Clone, Parser)]
#[command(
    name = "argo-qc",
    version,
    about = "Quality control Argo float temperature and salinity profiles",
    long_about = "Applies range, spike, gradient, density-inversion and depth-gap checks to \
                  Argo profiles, assigns Argo QC flags to every measurement, writes cleaned \
                  profiles with per-profile reports, and summarises the run."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Quality control a directory or file of profiles
    Run(RunArgs),
    /// Print the effective QC thresholds
    Thresholds(ThresholdsArgs),
    /// Validate a configuration file
    CheckConfig(CheckConfigArgs),
}

/// Arguments for the run command
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Configuration file (JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_PATH,
        help = "Configuration file"
    )]
    pub config: PathBuf,

    /// Profile document or directory of documents
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "Profile JSON file or directory"
    )]
    pub input: PathBuf,

    /// Directory for profiles.jsonl and qc_reports.jsonl
    ///
    /// Results are only summarised when omitted.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Concurrent workers; 0 uses every CPU
    #[arg(
        short = 'w',
        long = "workers",
        value_name = "N",
        help = "Override processing.max_workers (0 = all CPUs)"
    )]
    pub workers: Option<usize>,

    /// Glob pattern for profile documents inside a directory input
    #[arg(
        short = 'p',
        long = "pattern",
        value_name = "GLOB",
        default_value = DEFAULT_PROFILE_PATTERN
    )]
    pub pattern: String,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors; also hides the progress bar
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl RunArgs {
    /// Log level from the flags, falling back to the configured level
    pub fn get_log_level(&self, configured: &str) -> String {
        if self.quiet {
            return "error".to_string();
        }
        match self.verbose {
            0 => configured.to_ascii_lowercase(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Arguments for the thresholds command
#[derive(Debug, Clone, Parser)]
pub struct ThresholdsArgs {
    /// Configuration file; built-in defaults are shown when omitted
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only show one variable code, e.g. TEMP
    #[arg(long = "variable", value_name = "NAME")]
    pub variable: Option<String>,
}

/// Arguments for the check-config command
#[derive(Debug, Clone, Parser)]
pub struct CheckConfigArgs {
    /// Configuration file to validate
    #[arg(value_name = "FILE")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let args = Args::try_parse_from([
            "argo-qc", "run", "--input", "profiles", "--output", "out", "-w", "4", "-vv",
        ])
        .unwrap();

        match args.command {
            Some(Commands::Run(run)) => {
                assert_eq!(run.input, PathBuf::from("profiles"));
                assert_eq!(run.output, Some(PathBuf::from("out")));
                assert_eq!(run.workers, Some(4));
                assert_eq!(run.config, PathBuf::from(DEFAULT_CONFIG_PATH));
                assert_eq!(run.pattern, DEFAULT_PROFILE_PATTERN);
                assert_eq!(run.get_log_level("warn"), "debug");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["argo-qc", "run", "-i", "x", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_log_level_defaults_to_configured() {
        let args = Args::try_parse_from(["argo-qc", "run", "-i", "x"]).unwrap();
        let Some(Commands::Run(run)) = args.command else {
            panic!("expected run command");
        };
        assert_eq!(run.get_log_level("WARN"), "warn");
        assert!(run.show_progress());
    }

    #[test]
    fn test_parse_thresholds_and_check_config() {
        let args = Args::try_parse_from(["argo-qc", "thresholds", "--variable", "TEMP"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Commands::Thresholds(ThresholdsArgs { variable: Some(ref v), config: None })) if v == "TEMP"
        ));

        let args = Args::try_parse_from(["argo-qc", "check-config", "cfg.json"]).unwrap();
        assert!(matches!(args.command, Some(Commands::CheckConfig(_))));
    }
}
