//! First-class move types for quantum tic-tac-toe.
//!
//! Moves are domain events, not side effects. They represent
//! the player's intent and can be validated independently of execution.

use super::Player;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Whether a move places a permanent mark or a superposed pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum MoveKind {
    /// One permanent mark on one empty square.
    Classical,
    /// A linked pair of pending marks across two squares.
    Quantum,
}

/// A move: a player's mark placed on one square, or spread over two.
///
/// A classical move names the same square twice. Moves are committed
/// once and never edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    player: Player,
    square_a: usize,
    square_b: usize,
    turn: u32,
    kind: MoveKind,
}

impl Move {
    /// Creates a classical move on `square`.
    #[instrument]
    pub fn classical(player: Player, square: usize, turn: u32) -> Self {
        Self {
            player,
            square_a: square,
            square_b: square,
            turn,
            kind: MoveKind::Classical,
        }
    }

    /// Creates a quantum move entangling `square_a` and `square_b`.
    #[instrument]
    pub fn quantum(player: Player, square_a: usize, square_b: usize, turn: u32) -> Self {
        Self {
            player,
            square_a,
            square_b,
            turn,
            kind: MoveKind::Quantum,
        }
    }

    /// Returns the player making this move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// First square named by the move.
    pub fn square_a(&self) -> usize {
        self.square_a
    }

    /// Second square named by the move (equal to the first when classical).
    pub fn square_b(&self) -> usize {
        self.square_b
    }

    /// Both squares, in the order given.
    pub fn squares(&self) -> [usize; 2] {
        [self.square_a, self.square_b]
    }

    /// Turn number the move was proposed for.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Classical or quantum.
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Whether the move leaves pending marks.
    pub fn is_quantum(&self) -> bool {
        self.kind == MoveKind::Quantum
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            MoveKind::Classical => write!(f, "{}: {}", self.player, self.square_a),
            MoveKind::Quantum => write!(f, "{}: {}-{}", self.player, self.square_a, self.square_b),
        }
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The target square cannot take the mark.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(usize),

    /// Square index outside 0-8.
    #[display("Square index {} is out of range (must be 0-8)", _0)]
    InvalidSquareIndex(usize),

    /// A quantum move naming the same square twice.
    #[display("Quantum move must span two distinct squares, got {} twice", _0)]
    DegenerateQuantumMove(usize),

    /// A classical move naming two different squares.
    #[display("Classical move names two squares ({} and {})", _0, _1)]
    ClassicalSquareMismatch(usize, usize),

    /// Turn number does not match the ledger.
    #[display("Out of sequence: expected turn {}, got {}", expected, found)]
    OutOfSequenceTurn {
        /// Turn the ledger expects next.
        expected: u32,
        /// Turn carried by the move.
        found: u32,
    },

    /// It's not this player's turn.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(Player),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// The move would give an entangled component more moves than squares.
    #[display("Entangling squares {} and {} can never collapse consistently", _0, _1)]
    OverconstrainedEntanglement(usize, usize),

    /// An internal invariant was violated. Non-recoverable.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classical_move_names_one_square() {
        let mv = Move::classical(Player::X, 4, 1);
        assert_eq!(mv.squares(), [4, 4]);
        assert!(!mv.is_quantum());
        assert_eq!(mv.to_string(), "X: 4");
    }

    #[test]
    fn test_quantum_move_display() {
        let mv = Move::quantum(Player::O, 1, 2, 1);
        assert!(mv.is_quantum());
        assert_eq!(mv.to_string(), "O: 1-2");
    }

    #[test]
    fn test_error_messages() {
        assert!(MoveError::SquareOccupied(3).to_string().contains("occupied"));
        let err = MoveError::OutOfSequenceTurn {
            expected: 2,
            found: 5,
        };
        assert_eq!(err.to_string(), "Out of sequence: expected turn 2, got 5");
    }
}
