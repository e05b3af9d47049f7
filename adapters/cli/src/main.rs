#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless gridiron match and prints a
//! deterministic summary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gridiron_core::{HumanInput, Playbook, SimTuning, TeamIndex};
use gridiron_simulation::{Simulation, SimulationConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Longest match the `--full-game` flag will simulate.
const FULL_GAME_TICK_LIMIT: u64 = 2_000_000;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deterministic gridiron match simulator")]
struct Cli {
    /// Number of fixed 60 Hz ticks to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Keep ticking until the final quarter ends, ignoring `--ticks`.
    #[arg(long)]
    full_game: bool,
    /// Seed of the match's random generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Team whose players are tagged for human control.
    #[arg(long, value_enum)]
    human_team: Option<Team>,
    /// Team receiving the opening kickoff.
    #[arg(long, value_enum, default_value_t = Team::Home)]
    receiving_team: Team,
    /// Playbook TOML replacing the built-in one.
    #[arg(long)]
    playbook: Option<PathBuf>,
    /// Tuning TOML overriding individual defaults.
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Team {
    Home,
    Away,
}

impl From<Team> for TeamIndex {
    fn from(team: Team) -> Self {
        match team {
            Team::Home => TeamIndex::HOME,
            Team::Away => TeamIndex::AWAY,
        }
    }
}

/// Entry point for the gridiron command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let playbook = load_playbook(cli.playbook.as_deref())?;
    let tuning = load_tuning(cli.tuning.as_deref())?;
    let config = SimulationConfig {
        seed: cli.seed,
        human_team: cli.human_team.map(TeamIndex::from),
        receiving_team: cli.receiving_team.into(),
        headless: true,
    };

    let mut simulation =
        Simulation::new(config, playbook, tuning).context("failed to set up the match")?;
    let limit = if cli.full_game {
        FULL_GAME_TICK_LIMIT
    } else {
        cli.ticks
    };
    info!(limit, seed = cli.seed, "running match");

    let input = HumanInput::default();
    for _ in 0..limit {
        if simulation.finished() {
            break;
        }
        simulation.tick(&input);
        for event in simulation.drain_events() {
            debug!(?event, "event");
        }
    }

    print!("{}", simulation.summary());
    Ok(())
}

fn load_playbook(path: Option<&Path>) -> Result<Playbook> {
    let Some(path) = path else {
        return gridiron_content::default_playbook().context("built-in playbook is invalid");
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read playbook {}", path.display()))?;
    gridiron_content::parse_playbook(&text)
        .with_context(|| format!("failed to parse playbook {}", path.display()))
}

fn load_tuning(path: Option<&Path>) -> Result<SimTuning> {
    let Some(path) = path else {
        return Ok(SimTuning::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning {}", path.display()))?;
    gridiron_content::parse_tuning(&text)
        .with_context(|| format!("failed to parse tuning {}", path.display()))
}
