//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs the logger
//! - builds the connection config (environment, then CLI overrides)
//! - dispatches to sync, batch, analyze or export

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{AnalyzeArgs, BatchArgs, Cli, Command, ExportArgs, LogLevel, SyncArgs};
use crate::config::SyncConfig;
use crate::data::{FredClient, SeriesProvider};
use crate::domain::SeriesId;
use crate::error::AppError;
use crate::store::{MemoryStore, PgStore, SeriesStore};
use crate::sync::{BatchEntry, derive_table_spec, sync_batch, sync_series};

pub mod pipeline;

/// Entry point for the `fred-db` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    let mut config = SyncConfig::from_env()?;
    config.apply_overrides(&cli.connection.overrides());

    match cli.command {
        Command::Sync(args) => handle_sync(args, &config),
        Command::Batch(args) => handle_batch(args, &config),
        Command::Analyze(args) => handle_analyze(args, &config),
        Command::Export(args) => handle_export(args, &config),
    }
}

fn init_logging(level: LogLevel) -> Result<(), AppError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level.as_tracing())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::config(format!("Failed to install logger: {e}")))
}

fn handle_sync(args: SyncArgs, config: &SyncConfig) -> Result<(), AppError> {
    let ids = args
        .series
        .iter()
        .map(|raw| SeriesId::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let provider = FredClient::from_config(&config.provider)?;

    if args.dry_run {
        let mut store = MemoryStore::new();
        let result = sync_each(&provider, &mut store, &ids);
        print_statements(&store);
        result
    } else {
        let mut store = PgStore::new(&config.store)?;
        sync_each(&provider, &mut store, &ids)
    }
}

/// Sync `ids` in order, stopping at the first failure.
fn sync_each<P, S>(provider: &P, store: &mut S, ids: &[SeriesId]) -> Result<(), AppError>
where
    P: SeriesProvider + ?Sized,
    S: SeriesStore + ?Sized,
{
    for id in ids {
        match sync_series(provider, store, id) {
            Ok(report) => println!("{}", crate::report::format_sync_report(&report)),
            Err(failure) => {
                tracing::error!("{failure}");
                return Err(failure.error);
            }
        }
    }
    Ok(())
}

fn handle_batch(args: BatchArgs, config: &SyncConfig) -> Result<(), AppError> {
    let entries = if args.series.is_empty() {
        BatchEntry::defaults()?
    } else {
        args.series
            .iter()
            .map(|raw| BatchEntry::parse(raw))
            .collect::<Result<Vec<_>, _>>()?
    };
    let provider = FredClient::from_config(&config.provider)?;

    let report = if args.dry_run {
        let mut store = MemoryStore::new();
        let report = sync_batch(&provider, &mut store, &entries);
        print_statements(&store);
        report
    } else {
        let mut store = PgStore::new(&config.store)?;
        sync_batch(&provider, &mut store, &entries)
    };

    // Per-entry failures are reported, not propagated.
    println!("{}", crate::report::format_batch_report(&report));
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs, config: &SyncConfig) -> Result<(), AppError> {
    let source = pipeline::SeriesSource::from_args(args.series.as_deref(), args.csv.clone())?;
    let report = pipeline::run_analysis(&source, &config.provider)?;

    println!("{}", crate::report::format_analysis_report(&report));
    if !args.no_plot {
        println!("{}", crate::plot::render_report_plot(&report, args.width, args.height));
    }

    if let Some(path) = &args.export_json {
        crate::io::write_report_json(path, &report)?;
        tracing::info!(path = %path.display(), "wrote analysis report");
    }
    Ok(())
}

fn handle_export(args: ExportArgs, config: &SyncConfig) -> Result<(), AppError> {
    let id = SeriesId::parse(&args.series)?;
    let provider = FredClient::from_config(&config.provider)?;
    let series = provider.fetch_series(&id)?;

    let table = derive_table_spec(&series.metadata);
    let path = args.out.unwrap_or_else(|| PathBuf::from(format!("{}.csv", table.name)));
    crate::io::write_series_csv(&path, &table, &series.observations)?;

    println!("Wrote {} rows of {id} to {}", series.observations.len(), path.display());
    Ok(())
}

fn print_statements(store: &MemoryStore) {
    for stmt in store.statements() {
        println!("{stmt}");
    }
}
