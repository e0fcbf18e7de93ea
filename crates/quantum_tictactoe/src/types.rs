//! Core domain types for quantum tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of squares on the board.
pub const SQUARE_COUNT: usize = 9;

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Player {
    /// Player X (goes first by default).
    X,
    /// Player O.
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Lowercase symbol used for superposed marks.
    pub fn spooky_symbol(self) -> char {
        match self {
            Player::X => 'x',
            Player::O => 'o',
        }
    }
}

/// A mark left on a square by a committed move.
///
/// Whether the mark is pending or resolved is carried by the [`Square`]
/// holding it, so a square can never mix the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Mark {
    /// Owner of the mark.
    pub player: Player,
    /// Ledger index of the move that created the mark.
    pub move_index: usize,
    /// Turn subscript of that move; orders completed lines.
    pub turn: u32,
}

/// Lifecycle state of a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum MarkState {
    /// Superposed across the two squares of a quantum move.
    Pending,
    /// Permanent, single-square mark.
    Resolved,
}

/// A mark fixed to a square by a collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct ResolvedMark {
    /// Square that received the mark.
    pub square: usize,
    /// The resolved mark.
    pub mark: Mark,
}

/// One of the nine board positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Zero or more pending marks, in commit order.
    Open(Vec<Mark>),
    /// Exactly one permanent mark.
    Resolved(Mark),
}

impl Square {
    /// An open square with no marks at all.
    pub fn empty() -> Self {
        Square::Open(Vec::new())
    }

    /// Whether the square holds no mark of any kind.
    pub fn is_empty(&self) -> bool {
        matches!(self, Square::Open(marks) if marks.is_empty())
    }

    /// Whether the square holds a permanent mark.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Square::Resolved(_))
    }

    /// Pending marks on this square (empty once resolved).
    pub fn pending(&self) -> &[Mark] {
        match self {
            Square::Open(marks) => marks,
            Square::Resolved(_) => &[],
        }
    }

    /// The permanent mark, if any.
    pub fn resolved(&self) -> Option<Mark> {
        match self {
            Square::Resolved(mark) => Some(*mark),
            Square::Open(_) => None,
        }
    }

    /// State of the marks held here, or `None` for an empty square.
    pub fn mark_state(&self) -> Option<MarkState> {
        match self {
            Square::Resolved(_) => Some(MarkState::Resolved),
            Square::Open(marks) if marks.is_empty() => None,
            Square::Open(_) => Some(MarkState::Pending),
        }
    }
}

impl Default for Square {
    fn default() -> Self {
        Self::empty()
    }
}

/// Error raised by a board mutation that would break square occupancy rules.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// Position outside 0-8.
    #[display("Position {} is out of bounds", _0)]
    OutOfBounds(usize),
    /// The square already holds a permanent mark.
    #[display("Square {} is already resolved", _0)]
    AlreadyResolved(usize),
    /// Resolving a square that still carries pending marks.
    #[display("Square {} still holds pending marks", _0)]
    StillPending(usize),
}

impl std::error::Error for BoardError {}

/// 3x3 quantum tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; SQUARE_COUNT],
}

impl Board {
    /// Creates a new empty board.
    #[instrument]
    pub fn new() -> Self {
        Self {
            squares: std::array::from_fn(|_| Square::empty()),
        }
    }

    /// Gets the square at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<&Square> {
        self.squares.get(pos)
    }

    /// Checks if a square holds no marks.
    pub fn is_empty(&self, pos: usize) -> bool {
        self.get(pos).is_some_and(Square::is_empty)
    }

    /// Checks if a square holds a permanent mark.
    pub fn is_resolved(&self, pos: usize) -> bool {
        self.get(pos).is_some_and(Square::is_resolved)
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; SQUARE_COUNT] {
        &self.squares
    }

    /// Whether the given move still has a pending mark on `pos`.
    pub fn has_pending(&self, pos: usize, move_index: usize) -> bool {
        self.get(pos)
            .is_some_and(|sq| sq.pending().iter().any(|m| m.move_index == move_index))
    }

    /// Adds a pending mark to an unresolved square.
    #[instrument(skip(self))]
    pub(crate) fn add_pending(&mut self, pos: usize, mark: Mark) -> Result<(), BoardError> {
        match self.squares.get_mut(pos) {
            None => Err(BoardError::OutOfBounds(pos)),
            Some(Square::Resolved(_)) => Err(BoardError::AlreadyResolved(pos)),
            Some(Square::Open(marks)) => {
                marks.push(mark);
                Ok(())
            }
        }
    }

    /// Removes the pending mark of `move_index` from `pos`, if present.
    #[instrument(skip(self))]
    pub(crate) fn remove_pending(&mut self, pos: usize, move_index: usize) -> bool {
        match self.squares.get_mut(pos) {
            Some(Square::Open(marks)) => {
                let before = marks.len();
                marks.retain(|m| m.move_index != move_index);
                marks.len() != before
            }
            _ => false,
        }
    }

    /// Places a permanent mark on an empty square.
    #[instrument(skip(self))]
    pub(crate) fn place_resolved(&mut self, pos: usize, mark: Mark) -> Result<(), BoardError> {
        let square = self
            .squares
            .get_mut(pos)
            .ok_or(BoardError::OutOfBounds(pos))?;
        match square {
            Square::Resolved(_) => return Err(BoardError::AlreadyResolved(pos)),
            Square::Open(marks) if !marks.is_empty() => {
                return Err(BoardError::StillPending(pos));
            }
            Square::Open(_) => {}
        }
        *square = Square::Resolved(mark);
        Ok(())
    }

    /// Overwrites a square without any rule checks.
    #[cfg(test)]
    pub(crate) fn set(&mut self, pos: usize, square: Square) {
        self.squares[pos] = square;
    }

    /// Read-only copy handed to drivers.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            squares: self.squares.clone(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the board for drivers and renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    squares: [Square; SQUARE_COUNT],
}

impl BoardSnapshot {
    /// Returns all squares.
    pub fn squares(&self) -> &[Square; SQUARE_COUNT] {
        &self.squares
    }

    /// Gets the square at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<&Square> {
        self.squares.get(pos)
    }

    /// `(player, move_index)` pairs of the pending marks on `pos`.
    pub fn pending_marks(&self, pos: usize) -> Vec<(Player, usize)> {
        self.get(pos)
            .map(|sq| sq.pending().iter().map(|m| (m.player, m.move_index)).collect())
            .unwrap_or_default()
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Marks carry their turn subscript: resolved marks render as `X3`,
    /// pending marks as `x1,o2`, and empty squares by their index.
    pub fn display(&self) -> String {
        let labels: Vec<String> = self
            .squares
            .iter()
            .enumerate()
            .map(|(pos, square)| match square {
                Square::Resolved(mark) => format!("{}{}", mark.player, mark.turn),
                Square::Open(marks) if marks.is_empty() => pos.to_string(),
                Square::Open(marks) => marks
                    .iter()
                    .map(|m| format!("{}{}", m.player.spooky_symbol(), m.turn))
                    .collect::<Vec<_>>()
                    .join(","),
            })
            .collect();
        let width = labels.iter().map(String::len).max().unwrap_or(1) + 2;

        let mut result = String::new();
        for row in 0..3 {
            let cells: Vec<String> = (0..3)
                .map(|col| format!("{:^width$}", labels[row * 3 + col]))
                .collect();
            result.push_str(&cells.join("|"));
            if row < 2 {
                result.push('\n');
                result.push_str(&vec!["-".repeat(width); 3].join("+"));
                result.push('\n');
            }
        }
        result
    }
}

impl std::fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
