//! Draw detection logic for quantum tic-tac-toe.

use super::super::Board;
use tracing::instrument;

/// Checks if every square holds a permanent mark.
///
/// A fully resolved board with no winner is a draw.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| s.is_resolved())
}

#[cfg(test)]
mod tests {
    use super::super::win::{evaluate, WinResult};
    use super::*;
    use crate::{Mark, Player, Square};

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_pending_square_not_full() {
        let mut board = Board::new();
        for pos in 0..8 {
            board.set(pos, Square::Resolved(Mark::new(Player::X, pos, 1)));
        }
        board.set(8, Square::Open(vec![Mark::new(Player::O, 8, 5)]));
        assert!(!is_full(&board));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / O X X / O X O
        let layout = [
            Player::X, Player::O, Player::X,
            Player::O, Player::X, Player::X,
            Player::O, Player::X, Player::O,
        ];
        let mut board = Board::new();
        for (pos, player) in layout.into_iter().enumerate() {
            board.set(pos, Square::Resolved(Mark::new(player, pos, pos as u32 / 2 + 1)));
        }
        assert!(is_full(&board));
        assert_eq!(evaluate(&board), WinResult::None);
    }
}
