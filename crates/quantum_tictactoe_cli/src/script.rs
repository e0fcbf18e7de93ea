//! TOML game scripts.
//!
//! ```toml
//! [engine]
//! seed = 7
//!
//! [[moves]]
//! player = "X"
//! squares = [0, 1]
//!
//! [[moves]]
//! player = "O"
//! squares = [4]
//! turn = 1
//! ```
//!
//! One square is a classical move, two a quantum move. `turn` defaults to
//! the turn the engine expects when the move is replayed.

use anyhow::{bail, Context, Result};
use quantum_tictactoe::{EngineConfig, Move, Player};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// A scripted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptMove {
    /// Player making the move.
    pub player: Player,
    /// One square for a classical move, two for a quantum move.
    pub squares: Vec<usize>,
    /// Turn subscript; the engine's expected turn when omitted.
    #[serde(default)]
    pub turn: Option<u32>,
}

impl ScriptMove {
    /// Builds the engine move, filling in `expected_turn` when no turn is given.
    #[instrument(skip(self), fields(player = %self.player))]
    pub fn to_move(&self, expected_turn: u32) -> Result<Move> {
        let turn = self.turn.unwrap_or(expected_turn);
        match self.squares.as_slice() {
            [square] => Ok(Move::classical(self.player, *square, turn)),
            [a, b] => Ok(Move::quantum(self.player, *a, *b, turn)),
            other => bail!("a move names one or two squares, got {}", other.len()),
        }
    }
}

/// A full game script: engine settings and the moves to replay.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Script {
    /// Engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Moves in commit order.
    #[serde(default)]
    pub moves: Vec<ScriptMove>,
}

impl Script {
    /// Parses a script from TOML.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let script: Self = toml::from_str(content).context("Failed to parse game script")?;
        debug!(moves = script.moves.len(), "Script parsed");
        Ok(script)
    }

    /// Loads a script from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
        let script = Self::from_toml_str(&content)?;
        info!(moves = script.moves.len(), "Script loaded");
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_tictactoe::MoveKind;

    #[test]
    fn test_parse_script() {
        let script = Script::from_toml_str(
            r#"
            [engine]
            seed = 3
            first_player = "O"

            [[moves]]
            player = "O"
            squares = [0, 8]

            [[moves]]
            player = "X"
            squares = [4]
            turn = 1
            "#,
        )
        .unwrap();

        assert_eq!(*script.engine.seed(), Some(3));
        assert_eq!(*script.engine.first_player(), Player::O);
        assert_eq!(script.moves.len(), 2);
        assert_eq!(script.moves[0].turn, None);
        assert_eq!(script.moves[1].turn, Some(1));
    }

    #[test]
    fn test_empty_script_uses_defaults() {
        let script = Script::from_toml_str("").unwrap();
        assert_eq!(script, Script::default());
    }

    #[test]
    fn test_move_shapes() {
        let classical = ScriptMove {
            player: Player::X,
            squares: vec![4],
            turn: None,
        };
        let mv = classical.to_move(2).unwrap();
        assert_eq!(mv.kind(), MoveKind::Classical);
        assert_eq!(mv.turn(), 2);

        let quantum = ScriptMove {
            player: Player::O,
            squares: vec![1, 7],
            turn: Some(5),
        };
        let mv = quantum.to_move(2).unwrap();
        assert_eq!(mv.squares(), [1, 7]);
        assert_eq!(mv.turn(), 5);

        let bad = ScriptMove {
            player: Player::X,
            squares: vec![0, 1, 2],
            turn: None,
        };
        assert!(bad.to_move(1).is_err());
    }
}
