use anyhow::{Context, Result};
use clap::Parser;
use commit_index::cli::{Cli, Commands};
use commit_index::config::Config;
use commit_index::driver::Driver;
use commit_index::reporter::{ConsoleReporter, RunOutcome};
use commit_index::store::{DocumentStore, MemoryStore, TantivyStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries prompts and results
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    match &cli.command {
        Some(Commands::Search { query, limit }) => search(&config, query, *limit),
        Some(Commands::Stats) => stats(&config),
        None => import(cli, &config),
    }
}

fn import(cli: &Cli, config: &Config) -> Result<ExitCode> {
    let mut reporter = ConsoleReporter::stdio();

    let outcome = if cli.dry_run {
        tracing::info!("Dry run: records are parsed and counted, not written");
        let mut store = MemoryStore::new();
        Driver::new(config, &mut store, &mut reporter)
            .assume_yes(cli.yes)
            .execute(cli.file.as_deref())
    } else {
        let mut store = TantivyStore::new(&config.store.index_path);
        Driver::new(config, &mut store, &mut reporter)
            .assume_yes(cli.yes)
            .execute(cli.file.as_deref())
    };

    match outcome {
        RunOutcome::Failed(err) => {
            if err.is_usage_error() {
                eprintln!("Usage: commit-index [OPTIONS] <FILE> (see --help)");
            }
            Ok(ExitCode::FAILURE)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

fn search(config: &Config, query: &str, limit: usize) -> Result<ExitCode> {
    let store = TantivyStore::new(&config.store.index_path);
    let hits = store
        .search(&config.store.collection, query, limit)
        .with_context(|| format!("Search in '{}' failed", config.store.collection))?;

    if hits.is_empty() {
        println!("No commits match '{}'", query);
        return Ok(ExitCode::SUCCESS);
    }

    for hit in &hits {
        let record = &hit.record;
        let date = record
            .date
            .map(|d| d.format("%Y-%m-%d %H:%M:%S %z").to_string())
            .unwrap_or_else(|| "-".to_string());
        let ticket = if record.ticket_id.is_empty() {
            "-"
        } else {
            record.ticket_id.as_str()
        };

        println!(
            "{:>6.2}  {}  {}  {}  {}",
            hit.score, record.id, ticket, date, record.author
        );
        println!("        {}", record.message);
        for change in &record.changes {
            println!("        {} {}", change.kind.as_str(), change.path);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn stats(config: &Config) -> Result<ExitCode> {
    let store = TantivyStore::new(&config.store.index_path);
    let count = store
        .count(&config.store.collection)
        .with_context(|| format!("Cannot count '{}'", config.store.collection))?;

    println!(
        "{}: {} commits in {}",
        config.store.collection,
        count,
        store.root().display()
    );
    Ok(ExitCode::SUCCESS)
}
