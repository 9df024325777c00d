//! skirmish — a predator/prey match between the bundled demo strategies.
//!
//! Every team fields the same scatter-prey / chase-predator pair in its own
//! colors.  Population changes, failsafe events and the final summary are
//! written as CSV to the output directory.

mod strategies;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arena_core::MatchConfig;
use arena_output::{CsvWriter, MatchRecorder};
use arena_sim::run_match;
use arena_strategy::Submission;

/// Tick cap used when neither the config file nor the CLI sets one.  The
/// demo strategies can stalemate.
const DEFAULT_TICK_CAP: u64 = 5_000;

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(version)]
#[command(about = "Run a predator/prey arena match between demo strategies")]
struct Cli {
    /// JSON match configuration; missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of competing teams.
    #[arg(short, long, default_value = "2")]
    teams: usize,

    /// Master RNG seed (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// Prey per team (overrides the config file).
    #[arg(long)]
    prey: Option<usize>,

    /// Predators per team (overrides the config file).
    #[arg(long)]
    predators: Option<usize>,

    /// Stop after this many ticks even if the match is undecided.
    /// Default: the config file's cap, else 5000.
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Run decision callbacks under a deadline.
    #[arg(long)]
    sandbox: bool,

    /// Directory for the CSV files.
    #[arg(short, long, default_value = "output/skirmish")]
    output: PathBuf,

    /// Log at DEBUG instead of INFO (RUST_LOG still wins).
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<MatchConfig> {
    let mut config: MatchConfig = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => MatchConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(prey) = cli.prey {
        config.prey_per_team = prey;
    }
    if let Some(predators) = cli.predators {
        config.predators_per_team = predators;
    }
    config.max_ticks = cli.max_ticks.or(config.max_ticks).or(Some(DEFAULT_TICK_CAP));
    config.sandbox |= cli.sandbox;

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let submissions: Vec<Submission> = (0..cli.teams).map(strategies::submission).collect();

    println!("=== skirmish — predator/prey arena ===");
    println!(
        "Teams: {}  |  Prey: {}  |  Predators: {}  |  Seed: {}  |  Sandbox: {}",
        cli.teams, config.prey_per_team, config.predators_per_team, config.seed, config.sandbox
    );
    println!();

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    let writer = CsvWriter::new(&cli.output)?;
    let mut recorder = MatchRecorder::new(writer);

    let t0 = Instant::now();
    let outcome = run_match(&config, submissions, &mut recorder)?;
    let elapsed = t0.elapsed();

    if let Some(e) = recorder.take_error() {
        eprintln!("output error: {e}");
    }

    println!("Match over after {} ticks in {:.3} s", outcome.ticks, elapsed.as_secs_f64());
    match outcome.winner_name() {
        Some(name) => println!("Winner: {name}"),
        None       => println!("No winner"),
    }
    println!();

    println!("{:<16} {:>10}", "Team", "Live prey");
    println!("{}", "-".repeat(27));
    for (name, live) in outcome.teams.iter().zip(&outcome.live_prey) {
        println!("{name:<16} {live:>10}");
    }
    println!();
    println!("CSV written to {}", cli.output.display());

    Ok(())
}
