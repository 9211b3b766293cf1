//! packmeter - Completion tracking engine for derivative Minecraft resource packs
//!
//! Command-line entry point. Stands in for the conversational front-end:
//! parses a request, runs the completion computation, prints each edition's
//! outcome, and logs the run metrics.
//!
//! # Execution Flow
//!
//! 1. Initialize logging → logs/packmeter_<date>.log (console in debug mode)
//! 2. Load settings and filter lists from packmeter-data/
//! 3. Build the catalog client and git synchronizer
//! 4. Run the computation, relaying progress events to stdout
//! 5. Print one result block per edition, reconcile progress channels
//! 6. Log the metrics summary
//!
//! # Usage
//!
//! ```text
//! packmeter <pack> [edition|all] [version] [--modded] [--debug]
//! ```

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use packmeter::metrics::Metrics;
use packmeter::models::EditionSelector;
use packmeter::services::{
    CatalogApi, DisplayApi, DisplayChannel, DisplayError, GitSync, HttpCatalog,
    ProgressChannelReconciler, ReconcileOutcome,
};
use packmeter::{
    APP_NAME, ConfigManager, MissingService, ProgressEvent, ProgressTracker, TaskOutcome, VERSION,
};
use std::sync::Arc;
use std::time::Instant;

/// Display surface for CLI runs. There is no live channel directory here, so
/// every lookup resolves to nothing and reconciliation is a logged skip.
struct NoopDisplay;

#[async_trait]
impl DisplayApi for NoopDisplay {
    async fn find_channel(&self, _id: &str) -> Result<Option<DisplayChannel>, DisplayError> {
        Ok(None)
    }

    async fn rename_channel(&self, _id: &str, _name: &str) -> Result<(), DisplayError> {
        Ok(())
    }
}

#[derive(Debug)]
struct CliArgs {
    pack: String,
    selector: EditionSelector,
    version: String,
    check_modded: bool,
    debug: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut positional = Vec::new();
    let mut check_modded = false;
    let mut debug = false;

    for arg in args {
        match arg.as_str() {
            "--modded" => check_modded = true,
            "--debug" => debug = true,
            other if other.starts_with("--") => bail!("Unknown flag: {other}"),
            _ => positional.push(arg.clone()),
        }
    }

    let Some(pack) = positional.first() else {
        bail!("Usage: packmeter <pack> [edition|all] [version] [--modded] [--debug]");
    };

    let selector = match positional.get(1) {
        Some(raw) => raw.parse::<EditionSelector>().map_err(anyhow::Error::msg)?,
        None => EditionSelector::All,
    };

    // "latest" is unknown to the catalog for Java and resolves to the most
    // recent version, which is the right default for an unpinned request.
    let version = positional
        .get(2)
        .cloned()
        .unwrap_or_else(|| "latest".to_string());

    Ok(CliArgs {
        pack: pack.clone(),
        selector,
        version,
        check_modded,
        debug,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args(&std::env::args().skip(1).collect::<Vec<_>>())?;

    let _guard = packmeter::logging::init("logs", "packmeter", args.debug, args.debug)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let metrics = Arc::new(Metrics::new());

    let config_manager = ConfigManager::new("packmeter-data")?;
    let settings = config_manager.load_settings()?;
    let filters = config_manager.load_filter_config()?;

    let catalog: Arc<dyn CatalogApi> =
        Arc::new(HttpCatalog::new(&settings).context("Failed to build catalog client")?);
    let syncer = Arc::new(GitSync::with_process_runner(&settings.repos_root));
    let service = MissingService::new(catalog.clone(), syncer, filters);
    let reconciler = ProgressChannelReconciler::new(catalog, Arc::new(NoopDisplay));

    let progress = ProgressTracker::new();
    let mut events = progress.subscribe();
    let progress_metrics = metrics.clone();
    let listener = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if matches!(event, ProgressEvent::UpdateStarted { .. }) {
                progress_metrics.record_repo_synced();
            }
            println!("{event}");
        }
    });

    let started = Instant::now();
    let outcomes = service
        .compute(
            &args.pack,
            args.selector,
            &args.version,
            args.check_modded,
            &progress,
        )
        .await?;
    metrics.record_compute_time(started.elapsed());

    for outcome in &outcomes {
        match outcome {
            TaskOutcome::Report(report) => {
                metrics.record_edition_computed();
                println!(
                    "\n{} ({}, {}): {}% complete, {} of {} baseline files missing",
                    report.pack,
                    report.edition,
                    report.version,
                    report.completion_text(),
                    report.missing.len(),
                    report.total
                );
                if !report.missing_report.is_empty() {
                    println!("--- missing ---\n{}", report.missing_report);
                }
                if let Some(nonconforming) = &report.nonconforming_report {
                    println!("--- non-conforming ---\n{nonconforming}");
                }

                match reconciler.reconcile(report).await {
                    ReconcileOutcome::Renamed => metrics.record_channel_rename(),
                    ReconcileOutcome::Skipped => metrics.record_channel_rename_skip(),
                }
            }
            TaskOutcome::Failed { message, .. } => {
                metrics.record_edition_failed();
                eprintln!("\n{message}");
            }
        }
    }

    // Last sender gone: the listener's recv errors out and the task ends.
    drop(progress);
    let _ = listener.await;

    metrics.log_summary();
    Ok(())
}
