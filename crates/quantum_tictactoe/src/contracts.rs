//! Contract-based validation for quantum tic-tac-toe.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use super::action::{Move, MoveError, MoveKind};
use super::invariants::{InvariantSet, QuantumInvariants};
use super::{GameState, GameStatus, SQUARE_COUNT};
use tracing::{error, instrument};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
///
/// Contracts formalize Hoare-style reasoning:
/// - Precondition: {P(state, action)} - must hold before applying action
/// - Postcondition: {Q(before, after)} - must hold after applying action
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    ///
    /// This verifies that the transition maintained system invariants.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: The game has not finished.
pub struct GameNotOver;

impl GameNotOver {
    /// Checks the precondition.
    #[instrument(skip(state))]
    pub fn check(state: &GameState) -> Result<(), MoveError> {
        match state.status() {
            GameStatus::InProgress => Ok(()),
            GameStatus::Finished(_) => Err(MoveError::GameOver),
        }
    }
}

/// Precondition: It must be the player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Checks the precondition.
    #[instrument(skip(state))]
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        if mov.player() != state.ledger().expected_player() {
            Err(MoveError::WrongPlayer(mov.player()))
        } else {
            Ok(())
        }
    }
}

/// Precondition: The move carries the ledger's next turn number.
pub struct InSequence;

impl InSequence {
    /// Checks the precondition.
    #[instrument(skip(state))]
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        let expected = state.ledger().expected_turn();
        if mov.turn() != expected {
            Err(MoveError::OutOfSequenceTurn {
                expected,
                found: mov.turn(),
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: Both squares are on the board.
pub struct SquaresInRange;

impl SquaresInRange {
    /// Checks the precondition.
    #[instrument]
    pub fn check(mov: &Move) -> Result<(), MoveError> {
        match mov.squares().into_iter().find(|&sq| sq >= SQUARE_COUNT) {
            Some(sq) => Err(MoveError::InvalidSquareIndex(sq)),
            None => Ok(()),
        }
    }
}

/// Precondition: Classical moves name one square, quantum moves two.
pub struct WellFormed;

impl WellFormed {
    /// Checks the precondition.
    #[instrument]
    pub fn check(mov: &Move) -> Result<(), MoveError> {
        let [a, b] = mov.squares();
        match mov.kind() {
            MoveKind::Classical if a != b => Err(MoveError::ClassicalSquareMismatch(a, b)),
            MoveKind::Quantum if a == b => Err(MoveError::DegenerateQuantumMove(a)),
            _ => Ok(()),
        }
    }
}

/// Precondition: Target squares can take the move's marks.
///
/// Classical moves need an empty square; quantum moves need unresolved ones.
pub struct SquaresAvailable;

impl SquaresAvailable {
    /// Checks the precondition.
    #[instrument(skip(state))]
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        let board = state.board();
        let blocked = match mov.kind() {
            MoveKind::Classical => !board.is_empty(mov.square_a()),
            MoveKind::Quantum => false,
        };
        if blocked {
            return Err(MoveError::SquareOccupied(mov.square_a()));
        }
        match mov.squares().into_iter().find(|&sq| board.is_resolved(sq)) {
            Some(sq) => Err(MoveError::SquareOccupied(sq)),
            None => Ok(()),
        }
    }
}

/// Precondition: A quantum move leaves its component collapsible.
pub struct CollapsibleEntanglement;

impl CollapsibleEntanglement {
    /// Checks the precondition.
    #[instrument(skip(state))]
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        let [a, b] = mov.squares();
        if mov.is_quantum() && !state.graph().can_entangle(a, b) {
            Err(MoveError::OverconstrainedEntanglement(a, b))
        } else {
            Ok(())
        }
    }
}

/// Composite precondition: every check a move must pass before commit.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(state))]
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        GameNotOver::check(state)?;
        SquaresInRange::check(mov)?;
        WellFormed::check(mov)?;
        PlayersTurn::check(mov, state)?;
        InSequence::check(mov, state)?;
        SquaresAvailable::check(mov, state)?;
        CollapsibleEntanglement::check(mov, state)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move commits.
///
/// Postconditions:
/// - Ledger grew by exactly one move
/// - Every quantum invariant holds
pub struct MoveContract;

impl Contract<GameState, Move> for MoveContract {
    fn pre(state: &GameState, action: &Move) -> Result<(), MoveError> {
        LegalMove::check(action, state)
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), MoveError> {
        if after.ledger().len() != before.ledger().len() + 1 {
            error!(
                before = before.ledger().len(),
                after = after.ledger().len(),
                "Ledger did not grow by one move"
            );
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: ledger must grow by exactly one move".to_string(),
            ));
        }

        QuantumInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            error!(%descriptions, "Postcondition failed");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
