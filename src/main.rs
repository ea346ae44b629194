//! gridprobe - batch probing over worksheet ranges
//!
//! Loads a TSV worksheet, probes every cell of a selected range concurrently
//! and writes the results into the columns to its right.

#![allow(missing_docs)]

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gridprobe::core::{Engine, ItemProcessor, RunOutcome, TracingProgress};
use gridprobe::utils::{format_duration, logging};
use gridprobe::{Config, DurationProbe, GridError, ReachabilityProbe, Worksheet};
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const EXIT_INPUT_ERROR: u8 = 2;
const EXIT_CANCELLED: u8 = 130;

#[derive(Debug, Parser)]
#[command(
    name = "gridprobe",
    version,
    long_version = gridprobe::LONG_VERSION,
    about = "Probe every cell of a worksheet range concurrently"
)]
struct Cli {
    #[command(subcommand)]
    probe: ProbeKind,

    /// Worker count (0 = one per processor)
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// YAML configuration file
    #[arg(long, global = true, env = "GRIDPROBE_CONFIG")]
    config: Option<PathBuf>,

    /// Where to save the sheet (defaults to overwriting --sheet)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Resolve the range and print the plan without probing
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Clone, Subcommand)]
enum ProbeKind {
    /// Check that each URL answers with a success status
    Reachability(Target),
    /// Measure the duration of each media file in seconds
    Duration(Target),
}

impl ProbeKind {
    fn target(&self) -> &Target {
        match self {
            ProbeKind::Reachability(target) | ProbeKind::Duration(target) => target,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ProbeKind::Reachability(_) => "reachability",
            ProbeKind::Duration(_) => "duration",
        }
    }
}

/// Where the items come from
#[derive(Debug, Clone, Args)]
struct Target {
    /// Worksheet to read (tab-separated)
    #[arg(long, env = "GRIDPROBE_SHEET")]
    sheet: PathBuf,

    /// Range to probe, e.g. A2:A100
    #[arg(long)]
    range: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let input_error = e
                .downcast_ref::<GridError>()
                .is_some_and(GridError::is_input_error);
            // Display with context chain, not Debug
            eprintln!("Error: {:#}", e);
            if input_error {
                ExitCode::from(EXIT_INPUT_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli).await?;
    logging::init(&config.logging);
    debug!(build = %gridprobe::build_info(), "Starting gridprobe");

    let Target {
        sheet: sheet_path,
        range: selection,
    } = cli.probe.target().clone();

    let mut sheet = Worksheet::load(&sheet_path)
        .await
        .with_context(|| format!("Failed to load worksheet {}", sheet_path.display()))?;
    let range = sheet.select(&selection)?;
    let engine = Engine::from_config(&range, &config.engine)?;

    info!(
        probe = cli.probe.name(),
        range = %selection,
        items = engine.total(),
        workers = engine.concurrency(),
        "Run planned"
    );
    if cli.dry_run {
        println!(
            "{} item(s) in {} from {}, {} worker(s), results starting at {}",
            engine.total(),
            selection,
            sheet_path.display(),
            engine.concurrency(),
            engine.origin().offset(0, engine.source().columns())
        );
        return Ok(ExitCode::SUCCESS);
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            trigger.cancel();
        }
    });

    let completed = match cli.probe {
        ProbeKind::Reachability(_) => {
            let probe = ReachabilityProbe::new(&config.probes)?;
            execute(&engine, &probe, &mut sheet, &cancel, cli.json).await?
        }
        ProbeKind::Duration(_) => {
            let probe = DurationProbe::new(&config.probes);
            execute(&engine, &probe, &mut sheet, &cancel, cli.json).await?
        }
    };

    if !completed {
        return Ok(ExitCode::from(EXIT_CANCELLED));
    }

    let target = cli.output.unwrap_or(sheet_path);
    sheet
        .save(&target)
        .await
        .with_context(|| format!("Failed to save worksheet {}", target.display()))?;
    Ok(ExitCode::SUCCESS)
}

/// Layer the configuration: file, then environment, then flags
async fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    config = config.with_env()?;

    if let Some(concurrency) = cli.concurrency {
        config.engine.concurrency = concurrency;
    }
    config.validate()?;
    Ok(config)
}

/// Run the engine and print the summary; returns whether the run completed
async fn execute<P>(
    engine: &Engine,
    probe: &P,
    sheet: &mut Worksheet,
    cancel: &CancellationToken,
    json: bool,
) -> anyhow::Result<bool>
where
    P: ItemProcessor,
    P::Output: Display,
{
    let outcome = engine.start(probe, &TracingProgress, sheet, cancel).await?;
    let summary = outcome.summary();
    let elapsed = format_duration(summary.elapsed.as_millis() as u64);

    if json {
        let status = if outcome.is_cancelled() { "cancelled" } else { "completed" };
        let report = serde_json::json!({ "status": status, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(!outcome.is_cancelled());
    }

    match &outcome {
        RunOutcome::Completed { .. } => {
            println!(
                "{}/{} done ({} ok, {} failed) in {} with {} worker(s)",
                summary.completed,
                summary.total,
                summary.succeeded,
                summary.failed,
                elapsed,
                summary.workers
            );
            Ok(true)
        }
        RunOutcome::Cancelled { .. } => {
            error!(
                completed = summary.completed,
                total = summary.total,
                "Run cancelled, worksheet left unchanged"
            );
            println!(
                "cancelled after {}/{} in {}, nothing written",
                summary.completed, summary.total, elapsed
            );
            Ok(false)
        }
    }
}
