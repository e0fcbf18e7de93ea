//! Owned game state: ledger, board, entanglement graph and status.

use super::rules::{evaluate, is_full, WinResult};
use super::{Board, EntanglementGraph, Ledger, Player, SQUARE_COUNT};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player won the game.
    Winner(Player),
    /// Both players won simultaneously.
    Tie,
    /// No legal move remains and nobody won.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is exactly one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Tie | Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "Player {} wins", player),
            Outcome::Tie => write!(f, "Simultaneous win"),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game has ended.
    Finished(Outcome),
}

/// Moves still open to the next player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMoves {
    /// Empty squares, open to a classical move.
    pub classical: Vec<usize>,
    /// Unresolved square pairs `a < b` open to a quantum move.
    pub quantum: Vec<[usize; 2]>,
}

impl LegalMoves {
    /// Whether no move of either kind is possible.
    pub fn is_empty(&self) -> bool {
        self.classical.is_empty() && self.quantum.is_empty()
    }
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) ledger: Ledger,
    pub(crate) board: Board,
    pub(crate) graph: EntanglementGraph,
    pub(crate) status: GameStatus,
}

impl GameState {
    /// Creates a new game opened by `first_player`.
    #[instrument]
    pub fn new(first_player: Player) -> Self {
        Self {
            ledger: Ledger::new(first_player),
            board: Board::new(),
            graph: EntanglementGraph::default(),
            status: GameStatus::InProgress,
        }
    }

    /// Returns the ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the entanglement graph.
    pub fn graph(&self) -> &EntanglementGraph {
        &self.graph
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Lists the moves open to the next player.
    #[instrument(skip(self))]
    pub fn legal_moves(&self) -> LegalMoves {
        if self.status != GameStatus::InProgress {
            return LegalMoves::default();
        }
        self.open_moves()
    }

    /// Moves the board and graph allow, regardless of status.
    fn open_moves(&self) -> LegalMoves {
        let classical = (0..SQUARE_COUNT)
            .filter(|&pos| self.board.is_empty(pos))
            .collect();

        let open: Vec<usize> = (0..SQUARE_COUNT)
            .filter(|&pos| !self.board.is_resolved(pos))
            .collect();
        let mut quantum = Vec::new();
        for (i, &a) in open.iter().enumerate() {
            for &b in &open[i + 1..] {
                if self.graph.can_entangle(a, b) {
                    quantum.push([a, b]);
                }
            }
        }

        LegalMoves { classical, quantum }
    }

    /// Status implied by the board and a fresh evaluation.
    #[instrument(skip(self))]
    pub(crate) fn derive_status(&self, result: WinResult) -> GameStatus {
        match result {
            WinResult::Winner(player) => GameStatus::Finished(Outcome::Winner(player)),
            WinResult::Tie => GameStatus::Finished(Outcome::Tie),
            WinResult::None if is_full(&self.board) => GameStatus::Finished(Outcome::Draw),
            WinResult::None if self.open_moves().is_empty() => {
                GameStatus::Finished(Outcome::Draw)
            }
            WinResult::None => GameStatus::InProgress,
        }
    }

    /// Evaluates the current board.
    pub fn evaluate(&self) -> WinResult {
        evaluate(&self.board)
    }
}
