//! Graph synchronisation: the stored graph matches the ledger and board.

use super::super::{EntanglementGraph, GameState};
use super::Invariant;

/// Invariant: the entanglement graph equals a fresh rebuild.
pub struct GraphSyncInvariant;

impl Invariant<GameState> for GraphSyncInvariant {
    fn holds(state: &GameState) -> bool {
        state.graph() == &EntanglementGraph::rebuild(state.ledger(), state.board())
    }

    fn description() -> &'static str {
        "Entanglement graph is in sync with the ledger and board"
    }
}
