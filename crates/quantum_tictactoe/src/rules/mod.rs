//! Game rules for quantum tic-tac-toe.
//!
//! This module contains pure functions over the board and entanglement
//! graph. Rules are separated from board storage so the engine can compose
//! them and tests can exercise each stage alone.

pub mod collapse;
pub mod cycle;
pub mod draw;
pub mod win;

pub use collapse::collapse;
pub use cycle::{find_loop, ThreeCycle};
pub use draw::is_full;
pub use win::{evaluate, winning_lines, WinResult, LINES};
