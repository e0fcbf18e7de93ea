//! Win detection with the earliest-mark tie-break.

use super::super::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Winning combinations: rows, columns, diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],            // Diagonals
];

/// Result of evaluating the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinResult {
    /// No player owns a full line.
    None,
    /// One player won outright.
    Winner(Player),
    /// Both players completed a line with equal subscript sums.
    Tie,
}

impl WinResult {
    /// Players credited with a win.
    pub fn winners(&self) -> Vec<Player> {
        match self {
            WinResult::None => Vec::new(),
            WinResult::Winner(player) => vec![*player],
            WinResult::Tie => vec![Player::X, Player::O],
        }
    }

    /// Whether anyone has won.
    pub fn is_decided(&self) -> bool {
        !matches!(self, WinResult::None)
    }
}

impl std::fmt::Display for WinResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinResult::None => write!(f, "No winner"),
            WinResult::Winner(player) => write!(f, "Player {} wins", player),
            WinResult::Tie => write!(f, "Simultaneous win for X and O"),
        }
    }
}

/// Lines fully owned by `player` through resolved marks, with the sum of
/// their marks' turn subscripts.
#[instrument(skip(board))]
pub fn winning_lines(board: &Board, player: Player) -> Vec<([usize; 3], u32)> {
    LINES
        .iter()
        .filter_map(|line| {
            let marks = line.map(|pos| board.get(pos).and_then(|sq| sq.resolved()));
            match marks {
                [Some(a), Some(b), Some(c)]
                    if a.player == player && b.player == player && c.player == player =>
                {
                    Some((*line, a.turn + b.turn + c.turn))
                }
                _ => None,
            }
        })
        .collect()
}

/// Smallest subscript sum over a player's winning lines.
fn best_sum(board: &Board, player: Player) -> Option<u32> {
    winning_lines(board, player).into_iter().map(|(_, sum)| sum).min()
}

/// Evaluates the board.
///
/// When both players own a line, the one whose best line has the strictly
/// smaller sum of turn subscripts completed first and wins; equal sums are
/// a simultaneous win.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> WinResult {
    let result = match (best_sum(board, Player::X), best_sum(board, Player::O)) {
        (None, None) => WinResult::None,
        (Some(_), None) => WinResult::Winner(Player::X),
        (None, Some(_)) => WinResult::Winner(Player::O),
        (Some(x), Some(o)) => {
            debug!(x_sum = x, o_sum = o, "Both players completed a line");
            match x.cmp(&o) {
                std::cmp::Ordering::Less => WinResult::Winner(Player::X),
                std::cmp::Ordering::Greater => WinResult::Winner(Player::O),
                std::cmp::Ordering::Equal => WinResult::Tie,
            }
        }
    };
    debug!(%result, "Board evaluated");
    result
}
