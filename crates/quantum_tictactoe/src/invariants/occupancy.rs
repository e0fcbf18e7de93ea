//! Single occupancy: no move is marked twice on a square or resolved twice.

use super::super::{GameState, Square};
use super::Invariant;
use std::collections::HashSet;

/// Invariant: a square holds at most one mark per move, and a move's
/// resolved mark lives on at most one square.
///
/// Pending and resolved marks cannot share a square by construction of
/// [`Square`]; this checks what the type cannot.
pub struct SingleOccupancyInvariant;

impl Invariant<GameState> for SingleOccupancyInvariant {
    fn holds(state: &GameState) -> bool {
        let mut resolved_moves = HashSet::new();

        for square in state.board().squares() {
            match square {
                Square::Resolved(mark) => {
                    if !resolved_moves.insert(mark.move_index) {
                        return false;
                    }
                }
                Square::Open(marks) => {
                    let mut seen = HashSet::new();
                    if !marks.iter().all(|m| seen.insert(m.move_index)) {
                        return false;
                    }
                }
            }
        }

        // A resolved move keeps no pending marks anywhere
        state
            .board()
            .squares()
            .iter()
            .flat_map(|sq| sq.pending())
            .all(|m| !resolved_moves.contains(&m.move_index))
    }

    fn description() -> &'static str {
        "Each move occupies a square at most once and resolves to a single square"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameEngine, Mark, Move, Player};

    #[test]
    fn test_fresh_game_holds() {
        let engine = GameEngine::with_seed(0);
        assert!(SingleOccupancyInvariant::holds(engine.state()));
    }

    #[test]
    fn test_duplicate_resolution_violates() {
        let mut engine = GameEngine::with_seed(0);
        engine.commit(Move::classical(Player::X, 4, 1)).unwrap();

        let mut state = engine.state().clone();
        state.board.set(0, Square::Resolved(Mark::new(Player::X, 0, 1)));
        assert!(!SingleOccupancyInvariant::holds(&state));
    }

    #[test]
    fn test_resolved_and_pending_violates() {
        let mut engine = GameEngine::with_seed(0);
        engine.commit(Move::quantum(Player::X, 0, 1, 1)).unwrap();

        let mut state = engine.state().clone();
        state.board.set(0, Square::Resolved(Mark::new(Player::X, 0, 1)));
        assert!(!SingleOccupancyInvariant::holds(&state));
    }
}
