//! The game engine: one owned instance per game.
//!
//! Each commit runs to completion before the next is accepted: ledger
//! append, board materialisation, graph rebuild, loop check, optional
//! collapse, win evaluation. The only nondeterminism is the collapse
//! choice, drawn from the engine's own random source.

use super::action::{Move, MoveError, MoveKind};
use super::contracts::{Contract, MoveContract};
use super::rules::{collapse, find_loop, ThreeCycle, WinResult};
use super::{
    BoardSnapshot, EngineConfig, EntanglementGraph, GameState, GameStatus, InvariantViolation,
    LegalMoves, Mark, Player, ResolvedMark,
};
use derive_getters::Getters;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

/// A collapse triggered by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct CollapseReport {
    /// The triangle that forced the collapse.
    cycle: ThreeCycle,
    /// Marks fixed by the collapse, in commit order.
    resolved: Vec<ResolvedMark>,
}

/// What a successful commit did.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Ledger index assigned to the move.
    move_index: usize,
    /// Collapse triggered by the move, if any.
    collapse: Option<CollapseReport>,
    /// Board evaluation after the move.
    result: WinResult,
    /// Game status after the move.
    status: GameStatus,
}

impl MoveOutcome {
    /// Whether the move forced a collapse.
    pub fn collapsed(&self) -> bool {
        self.collapse.is_some()
    }
}

impl From<InvariantViolation> for MoveError {
    fn from(violation: InvariantViolation) -> Self {
        MoveError::InvariantViolation(violation.description)
    }
}

/// Quantum tic-tac-toe engine.
///
/// Generic over its random source so tests and replays can fix a seed.
#[derive(Debug, Clone)]
pub struct GameEngine<R = ChaCha20Rng> {
    state: GameState,
    rng: R,
}

impl GameEngine<ChaCha20Rng> {
    /// Creates a new game with X to move and an entropy-seeded source.
    #[instrument]
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Creates a new game with X to move and a fixed seed.
    #[instrument]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Player::X, ChaCha20Rng::seed_from_u64(seed))
    }

    /// Creates a new game from configuration.
    #[instrument]
    pub fn from_config(config: &EngineConfig) -> Self {
        let rng = match config.seed() {
            Some(seed) => ChaCha20Rng::seed_from_u64(*seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self::with_rng(*config.first_player(), rng)
    }

    /// Commits `moves` in order on a fresh engine.
    ///
    /// Stops at the first rejected move.
    #[instrument(skip(moves), fields(count = moves.len()))]
    pub fn replay(config: &EngineConfig, moves: &[Move]) -> Result<Self, MoveError> {
        let mut engine = Self::from_config(config);
        for mv in moves {
            engine.commit(*mv)?;
        }
        Ok(engine)
    }
}

impl Default for GameEngine<ChaCha20Rng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GameEngine<R> {
    /// Creates a new game opened by `first_player`, drawing collapse
    /// choices from `rng`.
    #[instrument(skip(rng))]
    pub fn with_rng(first_player: Player, rng: R) -> Self {
        Self {
            state: GameState::new(first_player),
            rng,
        }
    }

    /// Validates and commits a move.
    ///
    /// All-or-nothing: on error the ledger, board and graph are unchanged.
    ///
    /// # Errors
    ///
    /// Input errors for illegal moves; [`MoveError::InvariantViolation`]
    /// for internal inconsistencies, which are not recoverable.
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub fn commit(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        if let Err(e) = MoveContract::pre(&self.state, &mv) {
            warn!(error = %e, "Move rejected");
            return Err(e);
        }

        let mut next = self.state.clone();
        let move_index = next.ledger.append(mv);
        let mark = Mark::new(mv.player(), move_index, mv.turn());
        let placed = match mv.kind() {
            MoveKind::Classical => next.board.place_resolved(mv.square_a(), mark),
            MoveKind::Quantum => next
                .board
                .add_pending(mv.square_a(), mark)
                .and_then(|()| next.board.add_pending(mv.square_b(), mark)),
        };
        if let Err(e) = placed {
            error!(error = %e, "Board rejected a validated move");
            return Err(MoveError::InvariantViolation(e.to_string()));
        }
        next.graph = EntanglementGraph::rebuild(&next.ledger, &next.board);

        let collapse_report = match find_loop(&next.graph) {
            Some(cycle) => {
                let resolved = collapse(&mut next.board, &next.graph, &cycle, &mut self.rng)
                    .inspect_err(|v| error!(violation = %v, "Collapse failed"))?;
                next.graph = EntanglementGraph::rebuild(&next.ledger, &next.board);
                Some(CollapseReport { cycle, resolved })
            }
            None => None,
        };

        let result = next.evaluate();
        next.status = next.derive_status(result);

        #[cfg(debug_assertions)]
        MoveContract::post(&self.state, &next)?;

        if let GameStatus::Finished(outcome) = next.status {
            info!(%outcome, "Game finished");
        }
        self.state = next;

        Ok(MoveOutcome {
            move_index,
            collapse: collapse_report,
            result,
            status: self.state.status,
        })
    }

    /// Read-only copy of the board.
    #[instrument(skip(self))]
    pub fn current_board(&self) -> BoardSnapshot {
        self.state.board.snapshot()
    }

    /// Committed moves in commit order.
    pub fn move_history(&self) -> &[Move] {
        self.state.ledger.moves()
    }

    /// Evaluates the current board without changing anything.
    #[instrument(skip(self))]
    pub fn evaluate(&self) -> WinResult {
        self.state.evaluate()
    }

    /// Returns the full game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    /// Player expected to move next.
    pub fn to_move(&self) -> Player {
        self.state.ledger.expected_player()
    }

    /// Turn number expected on the next move.
    pub fn expected_turn(&self) -> u32 {
        self.state.ledger.expected_turn()
    }

    /// Moves open to the next player.
    #[instrument(skip(self))]
    pub fn legal_moves(&self) -> LegalMoves {
        self.state.legal_moves()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Outcome, Square};

    #[test]
    fn test_quantum_move_places_linked_pair() {
        let mut engine = GameEngine::with_seed(0);
        let outcome = engine.commit(Move::quantum(Player::X, 0, 8, 1)).unwrap();

        assert_eq!(*outcome.move_index(), 0);
        assert!(!outcome.collapsed());
        let board = engine.current_board();
        assert_eq!(board.pending_marks(0), vec![(Player::X, 0)]);
        assert_eq!(board.pending_marks(8), vec![(Player::X, 0)]);
    }

    #[test]
    fn test_rejected_move_leaves_state_unchanged() {
        let mut engine = GameEngine::with_seed(0);
        engine.commit(Move::classical(Player::X, 4, 1)).unwrap();
        let before = engine.state().clone();

        let err = engine.commit(Move::classical(Player::O, 4, 1)).unwrap_err();
        assert_eq!(err, MoveError::SquareOccupied(4));
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.move_history().len(), 1);
    }

    #[test]
    fn test_triangle_collapses_on_commit() {
        let mut engine = GameEngine::with_seed(11);
        engine.commit(Move::quantum(Player::X, 0, 1, 1)).unwrap();
        engine.commit(Move::quantum(Player::O, 1, 2, 1)).unwrap();
        let outcome = engine.commit(Move::quantum(Player::X, 2, 0, 2)).unwrap();

        let report = outcome.collapse().as_ref().unwrap();
        assert_eq!(report.cycle().squares, [0, 1, 2]);
        assert_eq!(report.resolved().len(), 3);
        assert!(engine.state().graph().is_empty());
        let board = engine.current_board();
        assert!((0..3).all(|sq| matches!(board.get(sq), Some(Square::Resolved(_)))));
    }

    #[test]
    fn test_overconstrained_move_rejected() {
        let mut engine = GameEngine::with_seed(0);
        engine.commit(Move::quantum(Player::X, 0, 1, 1)).unwrap();
        engine.commit(Move::quantum(Player::O, 0, 1, 1)).unwrap();

        let err = engine.commit(Move::quantum(Player::X, 1, 0, 2)).unwrap_err();
        assert_eq!(err, MoveError::OverconstrainedEntanglement(1, 0));
        assert!(!engine.legal_moves().quantum.contains(&[0, 1]));
    }

    #[test]
    fn test_finished_game_rejects_moves() {
        let moves = [
            Move::classical(Player::X, 0, 1),
            Move::classical(Player::O, 3, 1),
            Move::classical(Player::X, 1, 2),
            Move::classical(Player::O, 4, 2),
            Move::classical(Player::X, 2, 3),
        ];
        let config = EngineConfig::default().with_seed(0);
        let mut engine = GameEngine::replay(&config, &moves).unwrap();
        assert_eq!(engine.status(), GameStatus::Finished(Outcome::Winner(Player::X)));
        assert!(engine.legal_moves().is_empty());

        let err = engine.commit(Move::classical(Player::O, 5, 3)).unwrap_err();
        assert_eq!(err, MoveError::GameOver);
    }

    #[test]
    fn test_first_player_from_config() {
        let config = EngineConfig::new(Some(1), Player::O);
        let mut engine = GameEngine::from_config(&config);
        assert_eq!(engine.to_move(), Player::O);
        assert!(engine.commit(Move::classical(Player::O, 4, 1)).is_ok());
        assert_eq!(engine.to_move(), Player::X);
    }
}
