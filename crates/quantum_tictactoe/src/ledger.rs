//! Append-only move ledger.
//!
//! The ledger is the source of truth for every derived structure: the
//! board's marks, the entanglement graph and the expected turn all follow
//! from the ordered moves held here.

use super::{Move, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Ordered sequence of committed moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    moves: Vec<Move>,
    first_player: Player,
}

impl Ledger {
    /// Creates an empty ledger whose first move belongs to `first_player`.
    #[instrument]
    pub fn new(first_player: Player) -> Self {
        Self {
            moves: Vec::new(),
            first_player,
        }
    }

    /// Committed moves in commit order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Move at a ledger index.
    pub fn get(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    /// Number of committed moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether no move has been committed.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Player who opened the game.
    pub fn first_player(&self) -> Player {
        self.first_player
    }

    /// Player expected to make the next move.
    pub fn expected_player(&self) -> Player {
        if self.moves.len() % 2 == 0 {
            self.first_player
        } else {
            self.first_player.opponent()
        }
    }

    /// Turn number expected on the next move.
    ///
    /// A turn is one move by each player, starting at 1.
    pub fn expected_turn(&self) -> u32 {
        (self.moves.len() / 2) as u32 + 1
    }

    /// Quantum moves with their ledger indices, in commit order.
    pub fn quantum_moves(&self) -> impl Iterator<Item = (usize, &Move)> {
        self.moves.iter().enumerate().filter(|(_, mv)| mv.is_quantum())
    }

    /// Appends a validated move and returns its ledger index.
    #[instrument(skip(self))]
    pub(crate) fn append(&mut self, mv: Move) -> usize {
        let index = self.moves.len();
        self.moves.push(mv);
        debug!(index, %mv, "Move appended to ledger");
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_advance_after_both_players() {
        let mut ledger = Ledger::new(Player::X);
        assert_eq!(ledger.expected_turn(), 1);
        assert_eq!(ledger.expected_player(), Player::X);

        ledger.append(Move::quantum(Player::X, 0, 1, 1));
        assert_eq!(ledger.expected_turn(), 1);
        assert_eq!(ledger.expected_player(), Player::O);

        ledger.append(Move::quantum(Player::O, 1, 2, 1));
        assert_eq!(ledger.expected_turn(), 2);
        assert_eq!(ledger.expected_player(), Player::X);
    }

    #[test]
    fn test_first_player_o() {
        let ledger = Ledger::new(Player::O);
        assert_eq!(ledger.expected_player(), Player::O);
    }

    #[test]
    fn test_quantum_moves_keep_ledger_indices() {
        let mut ledger = Ledger::new(Player::X);
        ledger.append(Move::classical(Player::X, 4, 1));
        ledger.append(Move::quantum(Player::O, 0, 1, 1));
        let indices: Vec<usize> = ledger.quantum_moves().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1]);
    }
}
