//! qttt - Quantum tic-tac-toe script runner
//!
//! Replays TOML game scripts through the rules engine and prints the result.

#![warn(missing_docs)]

mod cli;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use quantum_tictactoe::{EngineConfig, GameEngine, GameStatus, Move, MoveOutcome, Player};
use script::Script;
use std::path::Path;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            script,
            seed,
            first_player,
        } => run_replay(&script, seed, first_player),
        Command::Legal { script, seed } => run_legal(&script, seed),
    }
}

/// Loads a script and applies command-line overrides.
#[instrument]
fn load_script(path: &Path, seed: Option<u64>, first_player: Option<Player>) -> Result<Script> {
    let mut script = Script::from_file(path)?;
    if let Some(seed) = seed {
        script.engine = script.engine.with_seed(seed);
    }
    if let Some(player) = first_player {
        script.engine = EngineConfig::new(*script.engine.seed(), player);
    }
    Ok(script)
}

/// Commits every scripted move, calling `on_commit` after each one.
#[instrument(skip(script, on_commit), fields(moves = script.moves.len()))]
fn play(
    script: &Script,
    mut on_commit: impl FnMut(&Move, &MoveOutcome),
) -> Result<GameEngine> {
    let mut engine = GameEngine::from_config(&script.engine);
    for (index, scripted) in script.moves.iter().enumerate() {
        let mv = scripted.to_move(engine.expected_turn())?;
        let outcome = engine
            .commit(mv)
            .with_context(|| format!("Move {} ({}) rejected", index + 1, mv))?;
        debug!(index, collapsed = outcome.collapsed(), "Scripted move committed");
        on_commit(&mv, &outcome);
    }
    Ok(engine)
}

/// Replays a script, printing each move and the final board.
fn run_replay(path: &Path, seed: Option<u64>, first_player: Option<Player>) -> Result<()> {
    let script = load_script(path, seed, first_player)?;
    info!(path = %path.display(), "Replaying game script");

    let engine = play(&script, |mv, outcome| {
        println!("{}", mv);
        if let Some(report) = outcome.collapse() {
            let placed: Vec<String> = report
                .resolved()
                .iter()
                .map(|r| format!("{}{}@{}", r.mark.player, r.mark.turn, r.square))
                .collect();
            println!("  collapse: {}", placed.join(" "));
        }
    })?;

    println!();
    println!("{}", engine.current_board());
    println!();
    match engine.status() {
        GameStatus::InProgress => println!("In progress, {} to move", engine.to_move()),
        GameStatus::Finished(outcome) => println!("{}", outcome),
    }
    Ok(())
}

/// Replays a script and lists the next player's legal moves.
fn run_legal(path: &Path, seed: Option<u64>) -> Result<()> {
    let script = load_script(path, seed, None)?;
    let engine = play(&script, |_, _| {})?;
    let legal = engine.legal_moves();

    if legal.is_empty() {
        println!("No legal moves: {:?}", engine.status());
        return Ok(());
    }
    println!("{} to move on turn {}", engine.to_move(), engine.expected_turn());
    println!("classical: {:?}", legal.classical);
    println!("quantum:   {:?}", legal.quantum);
    Ok(())
}
