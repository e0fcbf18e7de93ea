//! Quantum tic-tac-toe rules engine.
//!
//! A move either places a classical mark on one empty square or a pair of
//! linked "spooky" marks across two unresolved squares. When three quantum
//! moves close a triangle, every move in that entangled component collapses
//! into a single classical mark. Wins are scored over resolved marks, with
//! the earliest-completed line breaking simultaneous wins.
//!
//! # Architecture
//!
//! - **Ledger**: append-only committed moves, the source of truth
//! - **Board**: nine squares of pending or resolved marks
//! - **Graph**: squares linked by still-pending quantum moves
//! - **Rules**: loop detection, collapse, win and draw evaluation
//! - **Engine**: owns the state and a seedable random source
//!
//! # Example
//!
//! ```
//! use quantum_tictactoe::{GameEngine, Move, Player};
//!
//! let mut engine = GameEngine::with_seed(7);
//! engine.commit(Move::quantum(Player::X, 0, 1, 1)).unwrap();
//! engine.commit(Move::quantum(Player::O, 1, 2, 1)).unwrap();
//! let outcome = engine.commit(Move::quantum(Player::X, 2, 0, 2)).unwrap();
//! assert!(outcome.collapsed());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod config;
pub mod contracts;
mod engine;
mod graph;
pub mod invariants;
mod ledger;
pub mod rules;
mod state;
mod types;

pub use action::{Move, MoveError, MoveKind};
pub use config::{ConfigError, EngineConfig};
pub use engine::{CollapseReport, GameEngine, MoveOutcome};
pub use graph::{Component, Edge, EdgeId, EntanglementGraph};
pub use invariants::{Invariant, InvariantSet, InvariantViolation, QuantumInvariants};
pub use ledger::Ledger;
pub use rules::{ThreeCycle, WinResult};
pub use state::{GameState, GameStatus, LegalMoves, Outcome};
pub use types::{
    Board, BoardError, BoardSnapshot, Mark, MarkState, Player, ResolvedMark, Square, SQUARE_COUNT,
};
