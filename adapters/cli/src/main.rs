#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter: headless runs, level validation, storage and the
//! single-line transfer codec.

mod level_transfer;
mod store;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use grid_strike_core::{Event, HeroClass};
use grid_strike_engine::Engine;
use grid_strike_world::level::{validate, LevelStore};

use level_transfer::TRANSFER_HEADER;
use store::JsonLevelStore;

#[derive(Debug, Parser)]
#[command(name = "grid-strike", about = "Grid Strike headless toolbox")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Check a level document and list every problem found.
    Validate {
        /// Path to the level JSON document.
        file: PathBuf,
    },
    /// Run a level headlessly with a single idle hero and print a summary.
    Run {
        /// Path to the level JSON document.
        file: PathBuf,
        /// Wall-clock budget of simulated seconds.
        #[arg(long, default_value_t = 30)]
        duration_secs: u64,
        /// Fixed tick length in milliseconds.
        #[arg(long, default_value_t = 100)]
        tick_ms: u64,
        /// Hero class controlled by the session.
        #[arg(long, value_enum, default_value_t = HeroArg::Vanguard)]
        hero: HeroArg,
    },
    /// Encode a level document into a single-line transfer string.
    Encode {
        /// Path to the level JSON document.
        file: PathBuf,
    },
    /// Decode a transfer string back into a level document.
    Decode {
        /// The transfer string produced by `encode`.
        input: String,
        /// Write the decoded JSON here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the levels stored in a directory.
    List {
        /// Store directory.
        #[arg(long, default_value = "levels")]
        dir: PathBuf,
    },
    /// Validate a level document and store it under a name.
    Save {
        /// Path to the level JSON document.
        file: PathBuf,
        /// Name to store the level under.
        name: String,
        /// Store directory.
        #[arg(long, default_value = "levels")]
        dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HeroArg {
    Vanguard,
    Lancer,
    Tracker,
    Grenadier,
    Pyro,
    Marksman,
    Shadow,
    Arcanist,
    Berserker,
    Archer,
}

impl From<HeroArg> for HeroClass {
    fn from(hero: HeroArg) -> Self {
        match hero {
            HeroArg::Vanguard => Self::Vanguard,
            HeroArg::Lancer => Self::Lancer,
            HeroArg::Tracker => Self::Tracker,
            HeroArg::Grenadier => Self::Grenadier,
            HeroArg::Pyro => Self::Pyro,
            HeroArg::Marksman => Self::Marksman,
            HeroArg::Shadow => Self::Shadow,
            HeroArg::Arcanist => Self::Arcanist,
            HeroArg::Berserker => Self::Berserker,
            HeroArg::Archer => Self::Archer,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        CliCommand::Validate { file } => {
            let level = store::read_level_file(&file)?;
            let problems = validate(&level);
            if problems.is_empty() {
                println!("{}: ok", level.metadata.name);
                return Ok(());
            }
            for problem in &problems {
                eprintln!("problem: {problem}");
            }
            bail!("level failed validation with {} problem(s)", problems.len());
        }
        CliCommand::Run {
            file,
            duration_secs,
            tick_ms,
            hero,
        } => {
            let level = store::read_level_file(&file)?;
            run_headless(level, duration_secs, tick_ms, hero.into())
        }
        CliCommand::Encode { file } => {
            let level = store::read_level_file(&file)?;
            println!("{}", level_transfer::encode(&level));
            Ok(())
        }
        CliCommand::Decode { input, out } => {
            let level = level_transfer::decode(&input)
                .with_context(|| format!("expected a {TRANSFER_HEADER} transfer string"))?;
            let json = serde_json::to_string_pretty(&level)?;
            match out {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("cannot write {}", path.display()))?,
                None => println!("{json}"),
            }
            Ok(())
        }
        CliCommand::List { dir } => {
            let names = JsonLevelStore::new(dir).list()?;
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
        CliCommand::Save { file, name, dir } => {
            let level = store::read_level_file(&file)?;
            let problems = validate(&level);
            if !problems.is_empty() {
                bail!("refusing to store an invalid level: {}", problems.join("; "));
            }
            JsonLevelStore::new(dir).save(&name, &level)?;
            println!("stored {name}");
            Ok(())
        }
    }
}

fn run_headless(
    level: grid_strike_core::LevelData,
    duration_secs: u64,
    tick_ms: u64,
    hero: HeroClass,
) -> anyhow::Result<()> {
    let mut engine = Engine::new();
    engine.load_level(level)?;
    engine.start(vec![hero])?;

    let dt = Duration::from_millis(tick_ms.max(1));
    let budget = Duration::from_secs(duration_secs);
    let mut snapshot = engine.snapshot();

    while snapshot.clock < budget {
        snapshot = engine.tick(dt)?;
        for event in engine.last_events() {
            match event {
                Event::TimerAlert { threshold } => {
                    log::info!("{} seconds remaining", threshold.seconds());
                }
                Event::StatusChanged { status } => log::info!("status changed: {status:?}"),
                _ => {}
            }
        }
        if snapshot.status.is_terminal() {
            break;
        }
    }

    println!("status: {:?}", snapshot.status);
    println!("elapsed: {:.1}s", snapshot.clock.as_secs_f64());
    println!("score: {}", snapshot.score);
    for player in &snapshot.players {
        let stats = engine.report().player(player.id).copied().unwrap_or_default();
        println!(
            "player {}: hp {}/{} moved {} fired {} defeated {}",
            player.id.get(),
            player.health.get(),
            player.max_health.get(),
            stats.cells_traveled,
            stats.shots_fired,
            stats.enemies_defeated,
        );
    }
    Ok(())
}
