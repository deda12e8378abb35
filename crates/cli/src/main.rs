mod batch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tomekeeper_core::{
    clean_query_title, load_config, parse_title, to_last_first, validate_config, Config, DecisionMaker,
};

use batch::{Batch, Report};

#[derive(Parser, Debug)]
#[command(name = "tomekeeper")]
#[command(about = "Parse, match and rank book releases")]
#[command(version)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml", env = "TOMEKEEPER_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide a batch of releases and print the ranked decisions as JSON
    Decide {
        /// Batch file (snapshot, optional criteria, releases)
        batch: PathBuf,

        /// Decide candidates on all cores
        #[arg(long)]
        parallel: bool,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Parse a single release title
    Parse { title: String },
    /// Print the indexer query form of a title
    Query { title: String },
    /// Print the "Last, First" sort form of an author name
    SortName { name: String },
}

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_logging();
    let args = Args::parse();

    match args.command {
        Command::Decide {
            batch,
            parallel,
            pretty,
        } => {
            let mut config = read_config(&args.config)?;
            config.decision.parallel |= parallel;
            decide(&config, &batch, pretty)
        }
        Command::Parse { title } => {
            let parsed = parse_title(&title);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }
        Command::Query { title } => {
            println!("{}", clean_query_title(&title));
            Ok(())
        }
        Command::SortName { name } => {
            println!("{}", to_last_first(&name));
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var("TOMEKEEPER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // stdout carries the command output.
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Load the config file if present, defaults otherwise.
fn read_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        info!("Loading configuration from {:?}", path);
        load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
    } else {
        info!("No configuration at {:?}, using defaults", path);
        Config::default()
    };

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

fn decide(config: &Config, path: &Path, pretty: bool) -> Result<()> {
    let batch = Batch::from_path(path)?;
    info!(
        releases = batch.releases.len(),
        authors = batch.snapshot.catalog.authors.len(),
        "Deciding batch"
    );

    let maker = DecisionMaker::new(config);
    let cancel = CancellationToken::new();
    let decisions = maker.evaluate_batch(batch.releases, &batch.snapshot, batch.criteria.as_ref(), &cancel);

    let report = Report::new(&decisions);
    let output = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);
    Ok(())
}
