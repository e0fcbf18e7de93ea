//! Paired marks: a pending mark always has its twin on the move's other square.

use super::super::GameState;
use super::Invariant;

/// Invariant: every pending mark belongs to a quantum move of the same
/// player and turn, and sits on both of that move's squares.
pub struct PairedMarksInvariant;

impl Invariant<GameState> for PairedMarksInvariant {
    fn holds(state: &GameState) -> bool {
        let board = state.board();

        board.squares().iter().enumerate().all(|(pos, square)| {
            square.pending().iter().all(|mark| {
                let Some(mv) = state.ledger().get(mark.move_index) else {
                    return false;
                };
                if !mv.is_quantum() || mv.player() != mark.player || mv.turn() != mark.turn {
                    return false;
                }
                let [a, b] = mv.squares();
                let twin = if pos == a { b } else { a };
                (pos == a || pos == b) && board.has_pending(twin, mark.move_index)
            })
        })
    }

    fn description() -> &'static str {
        "Pending marks come in linked pairs on their move's two squares"
    }
}
