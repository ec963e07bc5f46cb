//! Command-line interface for portsweep.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags left
//! unset fall back to the settings file, then to built-in defaults.

use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::scanner::{Orchestrator, ScanConfig, ScanReport};
use crate::types::PortRange;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A concurrent TCP connect port scanner.
#[derive(Parser, Debug)]
#[command(name = "portsweep")]
#[command(version)]
#[command(about = "Scan a host for open TCP ports", long_about = None)]
pub struct Args {
    /// Target IP address or hostname
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Starting port [default: 1]
    #[arg(short, long, value_name = "PORT")]
    pub start: Option<u32>,

    /// Ending port [default: 1024]
    #[arg(short, long, value_name = "PORT")]
    pub end: Option<u32>,

    /// Number of concurrent workers [default: 100]
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Write a plain-text report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Connect timeout in milliseconds [default: 1000]
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Maximum probes started per second, 0 for unlimited [default: 0]
    #[arg(short = 'r', long = "rate", value_name = "PPS")]
    pub rate_limit: Option<u32>,

    /// Don't draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Only print the result table
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to a JSON settings file
    #[arg(long, env = "PORTSWEEP_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Merge flags over `settings` into a scan configuration.
    pub fn scan_config(&self, settings: &Settings) -> CliResult<ScanConfig> {
        let range = PortRange::new(
            self.start.unwrap_or(settings.start_port),
            self.end.unwrap_or(settings.end_port),
        )?;

        let mut config = ScanConfig::new(range)
            .with_threads(self.threads.unwrap_or(settings.threads))
            .with_timeout(Duration::from_millis(
                self.timeout.unwrap_or(settings.timeout_ms),
            ))
            .with_rate_limit(self.rate_limit.unwrap_or(settings.rate_limit));

        if settings.progress && !self.no_progress && !self.quiet {
            config = config.with_progress();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run a scan as described by `args`.
///
/// Returns normally both when the scan completes and when it is cancelled
/// through `cancel`; only configuration, resolution and report-file
/// failures are errors.
pub async fn execute(args: Args, cancel: CancellationToken) -> CliResult<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let config = args.scan_config(&settings)?;

    let orchestrator = Orchestrator::new(config).with_cancellation(cancel);
    let target = orchestrator.resolve(&args.target).await?;

    if !args.quiet {
        output::print_scan_header(&target, orchestrator.config());
    }

    let report = orchestrator.scan(target).await?;

    if !report.is_complete() {
        output::print_interrupted(&report);
        return Ok(());
    }

    output::print_results(&report)?;

    if let Some(path) = &args.output {
        write_report_file(path, &report)?;
        if !args.quiet {
            output::print_info(&format!("Report written to {}", path.display()));
        }
    }

    Ok(())
}

fn write_report_file(path: &Path, report: &ScanReport) -> CliResult<()> {
    output::save_report(path, report).map_err(|source| CliError::Report {
        path: path.to_path_buf(),
        source,
    })
}
