//! Command-line interface for qttt.

use clap::{Parser, Subcommand};
use quantum_tictactoe::Player;
use std::path::PathBuf;

/// qttt - Quantum tic-tac-toe script runner
#[derive(Parser, Debug)]
#[command(name = "qttt")]
#[command(about = "Replays scripted quantum tic-tac-toe games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a game script and print each move, collapse and the final board
    Replay {
        /// Path to the game script
        script: PathBuf,

        /// Override the collapse seed from the script
        #[arg(long)]
        seed: Option<u64>,

        /// Override the player who opens the game
        #[arg(long, value_parser = parse_player)]
        first_player: Option<Player>,
    },

    /// Replay a game script, then list the moves open to the next player
    Legal {
        /// Path to the game script
        script: PathBuf,

        /// Override the collapse seed from the script
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Parses `X` or `O`, case-insensitively.
fn parse_player(value: &str) -> Result<Player, String> {
    match value.to_ascii_uppercase().as_str() {
        "X" => Ok(Player::X),
        "O" => Ok(Player::O),
        other => Err(format!("expected X or O, got {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replay_with_overrides() {
        let cli = Cli::parse_from(["qttt", "replay", "game.toml", "--seed", "5", "--first-player", "o"]);
        match cli.command {
            Command::Replay {
                script,
                seed,
                first_player,
            } => {
                assert_eq!(script, PathBuf::from("game.toml"));
                assert_eq!(seed, Some(5));
                assert_eq!(first_player, Some(Player::O));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_player() {
        assert!(Cli::try_parse_from(["qttt", "replay", "game.toml", "--first-player", "z"]).is_err());
    }
}
