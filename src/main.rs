use std::error::Error;
use std::process::ExitCode;
use std::thread;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use fishflow_service::condition::{classify_with, StatusRules};
use fishflow_service::config::{poll_interval, AppConfig};
use fishflow_service::db::{ConditionStore, MemoryStore, PgConditionStore};
use fishflow_service::ingest::cycle::run_cycle;
use fishflow_service::ingest::usgs::UsgsClient;
use fishflow_service::logging::{self, init_logger, DataSource};
use fishflow_service::model::FlowError;
use fishflow_service::rivers::{load_rivers, load_rivers_if_present, River, RiverRegistry};
use fishflow_service::summary::{format_flow, summarize};

#[derive(Parser)]
#[command(name = "fishflow", version, about = "River flow conditions for anglers")]
struct Cli {
    /// River registry file (overrides FISHFLOW_RIVERS)
    #[arg(long, global = true)]
    rivers: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, classify, and store the latest reading for every river
    Poll {
        /// Classify without writing to the database
        #[arg(long)]
        dry_run: bool,

        /// Repeat every N minutes instead of running once
        #[arg(long, value_name = "MINUTES")]
        every: Option<u64>,

        /// Print the cycle report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the latest status and trend for each river
    Status {
        /// Only this river (slug)
        #[arg(long)]
        river: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Classify a single flow value against an optimal range
    Classify {
        #[arg(long)]
        flow: Option<f64>,
        #[arg(long)]
        min: Option<f64>,
        #[arg(long)]
        max: Option<f64>,
        /// Calendar date for the winter ice rule (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(path) = cli.rivers {
        config.rivers_path = path;
    }

    if let Err(e) = init_logger(config.log_level, config.log_file.as_deref(), false) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::error(DataSource::System, None, &e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Classify { flow, min, max, date } => {
            let rules = classification_rules(config)?;
            let as_of = date.unwrap_or_else(|| Local::now().date_naive());
            let status = classify_with(&rules, flow, min, max, as_of);
            println!("{}", status.as_str());
            Ok(())
        }
        Command::Poll { dry_run, every, json } => poll(config, dry_run, every, json),
        Command::Status { river, json } => status(config, river.as_deref(), json),
    }
}

/// Status rules from the registry, or the defaults when there is no registry
/// file. A registry that exists but fails to load is an error, so `classify`
/// never disagrees with what `poll` would store.
fn classification_rules(config: &AppConfig) -> Result<StatusRules, FlowError> {
    match load_rivers_if_present(&config.rivers_path)? {
        Some(registry) => Ok(registry.rules.status),
        None => {
            logging::warn(
                DataSource::System,
                None,
                &format!(
                    "{} not found; using default classification rules",
                    config.rivers_path
                ),
            );
            Ok(StatusRules::default())
        }
    }
}

fn poll(
    config: &AppConfig,
    dry_run: bool,
    every: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let registry = load_rivers(&config.rivers_path)?;
    let source = UsgsClient::new()?;
    let mut database = if dry_run {
        None
    } else {
        Some(PgConditionStore::connect_and_verify(config.require_database_url()?)?)
    };

    loop {
        // Dry runs start every cycle from an empty store.
        let mut scratch = MemoryStore::new();
        let store: &mut dyn ConditionStore = match database.as_mut() {
            Some(pg) => pg,
            None => &mut scratch,
        };

        let as_of = Local::now().date_naive();
        let report = run_cycle(
            &registry.rivers,
            &source,
            store,
            &registry.rules.status,
            as_of,
            config.poll_delay,
        );

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for river in &report.processed {
                println!(
                    "{:<42} {:<13} {:>12}",
                    river.river_name,
                    river.status.label(),
                    format_flow(river.flow)
                );
            }
            for skipped in &report.skipped {
                println!("{:<42} skipped: {}", skipped.river_id, skipped.reason);
            }
        }

        match every {
            Some(minutes) => thread::sleep(poll_interval(minutes)),
            None => return Ok(()),
        }
    }
}

fn status(config: &AppConfig, river: Option<&str>, json: bool) -> Result<(), Box<dyn Error>> {
    let registry = load_rivers(&config.rivers_path)?;
    let mut store = PgConditionStore::connect_and_verify(config.require_database_url()?)?;

    let selected = select_rivers(&registry, river)?;
    let mut summaries = Vec::with_capacity(selected.len());
    for river in selected {
        summaries.push(summarize(river, &mut store, config.trend_window, &registry.rules.trend)?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            println!("{}", summary.line());
        }
    }
    Ok(())
}

fn select_rivers<'a>(
    registry: &'a RiverRegistry,
    slug: Option<&str>,
) -> Result<Vec<&'a River>, FlowError> {
    match slug {
        Some(slug) => registry
            .find(slug)
            .map(|river| vec![river])
            .ok_or_else(|| FlowError::Config(format!("unknown river '{}'", slug))),
        None => Ok(registry.rivers.iter().collect()),
    }
}
