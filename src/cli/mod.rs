//! # CLI Module
//!
//! Command-line interface for the drive inventory.
//!
//! ## Usage
//! ```bash
//! # Index H:, I: and J: into the current directory
//! drive-inventory scan
//!
//! # Explicit roots, preferring H's copy in duplicate groups
//! drive-inventory scan --volumes H=/mnt/h I=/mnt/i --priority H
//!
//! # JSON summary on stdout, reports left in the snapshot directory only
//! drive-inventory scan --output json --skip-copy
//! ```
//!
//! ## Exit codes
//! - `0` reports written
//! - `1` configuration or output error
//! - `2` nothing was recorded on any volume

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use drive_inventory::core::pipeline::{Pipeline, RunOutcome};
use drive_inventory::core::reporter::{decimal_comma, gibibytes, group_thousands, ArtifactPaths};
use drive_inventory::core::volume::Volume;
use drive_inventory::error::Result;
use drive_inventory::events::{Event, EventChannel, PipelineEvent, RunStatus, ScanEvent};
use drive_inventory::logging::RunLog;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

/// Drive Inventory - index volumes by content hash and list duplicates
#[derive(Parser, Debug)]
#[command(name = "drive-inventory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan volumes and write the index and duplicates reports
    Scan(ScanArgs),
}

#[derive(clap::Args, Debug)]
struct ScanArgs {
    /// Volumes to scan: a letter (H or H:) or ID=PATH
    #[arg(
        long,
        num_args = 1..,
        default_values_t = vec!["H".to_string(), "I".to_string(), "J".to_string()]
    )]
    volumes: Vec<String>,

    /// Root directory the reports are copied into
    #[arg(long, default_value = ".")]
    output_root: PathBuf,

    /// Where the reports are written first [default: <output-root>/_snapshots]
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Full index path [default: <snapshot-dir>/index_by_hash.csv]
    #[arg(long)]
    index: Option<PathBuf>,

    /// Grouped text index path [default: <snapshot-dir>/index_by_hash.txt]
    #[arg(long)]
    index_txt: Option<PathBuf>,

    /// Duplicates report path [default: <snapshot-dir>/dupes_confirmed.csv]
    #[arg(long)]
    dupes: Option<PathBuf>,

    /// Run log path [default: <output-root>/logs_<timestamp>/reindex.log]
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Status file path [default: next to the run log]
    #[arg(long)]
    status_file: Option<PathBuf>,

    /// Volume IDs whose copy is listed first in a duplicate group
    #[arg(long, num_args = 1..)]
    priority: Vec<String>,

    /// Extra directory names to prune (case-insensitive, repeatable)
    #[arg(long = "skip-dir")]
    skip_dirs: Vec<String>,

    /// Leave the reports in the snapshot directory only
    #[arg(long)]
    skip_copy: bool,

    /// Scan volumes concurrently
    #[arg(long)]
    parallel: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Show info-level log lines on the console
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => run_scan(args),
    }
}

impl ScanArgs {
    fn artifact_paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::under(&self.output_root);
        let mut paths = ArtifactPaths::layout(
            &self.output_root,
            self.snapshot_dir.clone().unwrap_or(defaults.snapshot_dir),
            self.log_file.clone().unwrap_or(defaults.log_file),
        );
        if let Some(path) = &self.index {
            paths.index_csv = path.clone();
        }
        if let Some(path) = &self.index_txt {
            paths.index_txt = path.clone();
        }
        if let Some(path) = &self.dupes {
            paths.duplicates_csv = path.clone();
        }
        if let Some(path) = &self.status_file {
            paths.status_file = path.clone();
        }
        paths
    }
}

fn run_scan(args: ScanArgs) -> Result<ExitCode> {
    let term = Term::stderr();
    let volumes = Volume::parse_all(&args.volumes)?;
    let paths = args.artifact_paths();

    let _log = RunLog::open(&paths.log_file, args.verbose)?;

    if matches!(args.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Drive Inventory").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder()
        .volumes(volumes)
        .priority(args.priority.clone())
        .artifacts(paths.clone())
        .skip_directories(args.skip_dirs.clone())
        .parallel_volumes(args.parallel)
        .copy_to_root(!args.skip_copy)
        .build();

    let (sender, receiver) = EventChannel::new();

    // File totals are unknown up front, so a spinner rather than a bar
    let progress = if matches!(args.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(phase.to_string());
                }
                Event::Scan(ScanEvent::VolumeStarted { volume, .. }) => {
                    pb.set_message(format!("Scanning {volume}:"));
                }
                Event::Scan(ScanEvent::VolumeMissing { volume, root }) => {
                    pb.println(format!(
                        "  {} {}: not found at {}",
                        style("-").dim(),
                        volume,
                        root.display()
                    ));
                }
                Event::Scan(ScanEvent::Progress(p)) => {
                    pb.set_message(format!(
                        "{}: {} files  {}",
                        p.volume,
                        group_thousands(p.files_recorded as u64),
                        p.current_path
                    ));
                }
                Event::Scan(ScanEvent::VolumeCompleted { volume, files, .. }) => {
                    pb.println(format!(
                        "  {} {}: {} files",
                        style("✓").green(),
                        volume,
                        group_thousands(files as u64)
                    ));
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Failed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let outcome = result?;
    match args.output {
        OutputFormat::Pretty => print_pretty_results(&term, &outcome),
        OutputFormat::Json => print_json_results(&outcome),
    }

    Ok(match outcome.status {
        RunStatus::Ok => ExitCode::SUCCESS,
        RunStatus::FailedEmpty => ExitCode::from(2),
    })
}

fn print_pretty_results(term: &Term, outcome: &RunOutcome) {
    let summary = &outcome.summary;

    if outcome.status == RunStatus::FailedEmpty {
        term.write_line(&format!(
            "{} No files were processed. Check that the volumes are mounted.",
            style("✗").red().bold()
        ))
        .ok();
        term.write_line(&format!(
            "  Status written to {}",
            style(outcome.status_file.display()).dim()
        ))
        .ok();
        return;
    }

    term.write_line(&format!("{} Inventory Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files indexed in {:.1}s",
        style(group_thousands(summary.files as u64)).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} unique hashes",
        style(group_thousands(summary.unique_hashes as u64)).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate groups ({} files)",
        style(group_thousands(summary.duplicates.groups as u64)).cyan(),
        group_thousands(summary.duplicates.files as u64)
    ))
    .ok();
    term.write_line(&format!(
        "  {} GB in total",
        style(decimal_comma(gibibytes(summary.total_bytes), 2)).yellow()
    ))
    .ok();
    term.write_line("").ok();

    for volume in &summary.volumes {
        let line = if volume.present {
            format!(
                "  {}: {} files, {} bytes",
                style(&volume.id).bold(),
                group_thousands(volume.files as u64),
                group_thousands(volume.bytes)
            )
        } else {
            format!("  {}: {}", style(&volume.id).bold(), style("not found").dim())
        };
        term.write_line(&line).ok();
    }
    term.write_line("").ok();

    term.write_line(&format!("{}", style("Artifacts:").bold().underlined()))
        .ok();
    for path in summary.artifacts.iter().chain(&outcome.copies) {
        term.write_line(&format!("  {}", path.display())).ok();
    }
    term.write_line(&format!("  {}", outcome.status_file.display()))
        .ok();

    if !summary.warnings.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!(
            "  {} warning messages repeated past the display limit; see the run log",
            style(summary.warnings.len()).yellow()
        ))
        .ok();
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style("No files were moved or deleted.").dim()
    ))
    .ok();
}

fn print_json_results(outcome: &RunOutcome) {
    let output = serde_json::json!({
        "status": outcome.status,
        "summary": outcome.summary,
        "copies": outcome.copies,
        "status_file": outcome.status_file,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Failed to render JSON summary: {e}"),
    }
}
