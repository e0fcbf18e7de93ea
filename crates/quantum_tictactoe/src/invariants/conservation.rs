//! Move conservation: no committed move disappears or duplicates.

use super::super::GameState;
use super::Invariant;

/// Invariant: every ledger move is on the board exactly once, either as a
/// resolved mark on one of its squares or as a pending pair.
pub struct MoveConservationInvariant;

impl Invariant<GameState> for MoveConservationInvariant {
    fn holds(state: &GameState) -> bool {
        let board = state.board();

        let accounted = state.ledger().moves().iter().enumerate().all(|(index, mv)| {
            let [a, b] = mv.squares();
            let resolved_on = |pos: usize| {
                board
                    .get(pos)
                    .and_then(|sq| sq.resolved())
                    .is_some_and(|m| m.move_index == index && m.player == mv.player())
            };
            let resolved = resolved_on(a) || resolved_on(b);
            let pending = mv.is_quantum() && board.has_pending(a, index) && board.has_pending(b, index);
            resolved != pending
        });

        let mark_count: usize = board
            .squares()
            .iter()
            .map(|sq| if sq.is_resolved() { 2 } else { sq.pending().len() })
            .sum();

        accounted && mark_count == 2 * state.ledger().len()
    }

    fn description() -> &'static str {
        "Every committed move is either resolved once or pending as one pair"
    }
}
