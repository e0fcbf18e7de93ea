//! Collapse of an entangled component into classical marks.
//!
//! Every quantum move in the cycle's component receives exactly one of its
//! two squares and no square receives two marks. Fixing one endpoint of an
//! edge pushes every other edge on that square to its far endpoint, and so
//! on until the component is determined. When more than one consistent
//! assignment survives propagation, one is drawn uniformly from the
//! caller's random source.

use super::super::{
    Board, Component, EdgeId, EntanglementGraph, InvariantViolation, Mark, ResolvedMark,
    SQUARE_COUNT,
};
use super::cycle::ThreeCycle;
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, error, info, instrument};

/// A (partial) mapping of component edges onto squares.
#[derive(Debug, Clone)]
struct Assignment {
    /// Chosen square per edge, indexed by `EdgeId`.
    square_of: Vec<Option<usize>>,
    /// Edge holding each square.
    owner: [Option<EdgeId>; SQUARE_COUNT],
}

impl Assignment {
    fn new(edge_count: usize) -> Self {
        Self {
            square_of: vec![None; edge_count],
            owner: [None; SQUARE_COUNT],
        }
    }

    /// Fixes `edge` on `square` and propagates the consequences.
    ///
    /// Returns `false` on contradiction.
    fn fix(&mut self, graph: &EntanglementGraph, edge: EdgeId, square: usize) -> bool {
        let mut queue = VecDeque::from([(edge, square)]);

        while let Some((edge, square)) = queue.pop_front() {
            match (self.square_of[edge.0], self.owner[square]) {
                (Some(chosen), _) if chosen == square => continue,
                (Some(_), _) => return false,
                (None, Some(_)) => return false,
                (None, None) => {}
            }
            self.square_of[edge.0] = Some(square);
            self.owner[square] = Some(edge);

            for &other in graph.incident(square) {
                if other == edge {
                    continue;
                }
                let far = graph.edges()[other.0].other(square);
                queue.push_back((other, far));
            }
        }
        true
    }
}

/// Enumerates every consistent assignment of `component`'s edges.
///
/// Branches on the earliest undetermined edge, trying its first square
/// before its second, so the result order is reproducible.
fn consistent_assignments(
    graph: &EntanglementGraph,
    component: &Component,
    partial: Assignment,
    out: &mut Vec<Assignment>,
) {
    let Some(&next) = component
        .edges
        .iter()
        .find(|id| partial.square_of[id.0].is_none())
    else {
        out.push(partial);
        return;
    };

    for square in graph.edges()[next.0].squares {
        let mut branch = partial.clone();
        if branch.fix(graph, next, square) {
            consistent_assignments(graph, component, branch, out);
        }
    }
}

/// Resolves every quantum move in the component of `cycle`.
///
/// Squares outside the component are untouched. Returns the newly
/// resolved marks in commit order.
///
/// # Errors
///
/// Returns an [`InvariantViolation`] if no consistent assignment exists or
/// the board does not match the graph. The board is left unchanged in that
/// case.
#[instrument(skip(board, graph, rng), fields(squares = ?cycle.squares))]
pub fn collapse<R: Rng>(
    board: &mut Board,
    graph: &EntanglementGraph,
    cycle: &ThreeCycle,
    rng: &mut R,
) -> Result<Vec<ResolvedMark>, InvariantViolation> {
    let component = graph.component(cycle.squares[0]);

    let mut assignments = Vec::new();
    consistent_assignments(
        graph,
        &component,
        Assignment::new(graph.len()),
        &mut assignments,
    );

    let chosen = match assignments.len() {
        0 => {
            error!(?component, "No consistent assignment for entangled component");
            return Err(InvariantViolation::new(format!(
                "collapse of squares {:?} reached a contradiction",
                component.squares
            )));
        }
        1 => &assignments[0],
        n => {
            let pick = rng.gen_range(0..n);
            debug!(candidates = n, pick, "Choosing among consistent assignments");
            &assignments[pick]
        }
    };

    let mut next = board.clone();
    for &id in &component.edges {
        let edge = graph.edges()[id.0];
        for square in edge.squares {
            if !next.remove_pending(square, edge.move_index) {
                error!(move_index = edge.move_index, square, "Pending mark missing from board");
                return Err(InvariantViolation::new(format!(
                    "move {} has no pending mark on square {}",
                    edge.move_index, square
                )));
            }
        }
    }

    let mut resolved = Vec::with_capacity(component.edges.len());
    for &id in &component.edges {
        let edge = graph.edges()[id.0];
        let square = chosen.square_of[id.0].ok_or_else(|| {
            InvariantViolation::new(format!("move {} left undetermined", edge.move_index))
        })?;
        let mark = Mark::new(edge.player, edge.move_index, edge.turn);
        next.place_resolved(square, mark)
            .map_err(|e| InvariantViolation::new(format!("collapse placement failed: {}", e)))?;
        resolved.push(ResolvedMark::new(square, mark));
    }

    if let Some(&square) = component
        .squares
        .iter()
        .find(|&&sq| next.get(sq).is_some_and(|s| !s.pending().is_empty()))
    {
        error!(square, "Pending marks survived collapse");
        return Err(InvariantViolation::new(format!(
            "square {} still pending after collapse",
            square
        )));
    }

    *board = next;
    info!(resolved = resolved.len(), "Entangled component collapsed");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::find_loop;
    use crate::{Ledger, Move, Player, Square};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn setup(pairs: &[(usize, usize)]) -> (Ledger, Board, EntanglementGraph) {
        let mut ledger = Ledger::new(Player::X);
        let mut board = Board::new();
        for &(a, b) in pairs {
            let index = ledger.len();
            let player = ledger.expected_player();
            let turn = ledger.expected_turn();
            ledger.append(Move::quantum(player, a, b, turn));
            board.add_pending(a, Mark::new(player, index, turn)).unwrap();
            board.add_pending(b, Mark::new(player, index, turn)).unwrap();
        }
        let graph = EntanglementGraph::rebuild(&ledger, &board);
        (ledger, board, graph)
    }

    fn assert_consistent(board: &Board, resolved: &[ResolvedMark], pairs: &[(usize, usize)]) {
        for rm in resolved {
            let (a, b) = pairs[rm.mark.move_index];
            assert!(rm.square == a || rm.square == b);
            assert_eq!(board.get(rm.square), Some(&Square::Resolved(rm.mark)));
        }
    }

    #[test]
    fn test_triangle_resolves_all_three() {
        let pairs = [(0, 1), (1, 2), (2, 0)];
        let (_, mut board, graph) = setup(&pairs);
        let cycle = find_loop(&graph).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let resolved = collapse(&mut board, &graph, &cycle, &mut rng).unwrap();
        assert_eq!(resolved.len(), 3);
        assert_consistent(&board, &resolved, &pairs);
        assert!((0..3).all(|sq| board.is_resolved(sq)));
    }

    #[test]
    fn test_tail_edges_resolve_away_from_cycle() {
        // Triangle 0-1-2 with a tail 2-5 and 5-8.
        let pairs = [(0, 1), (1, 2), (2, 5), (5, 8), (2, 0)];
        let (_, mut board, graph) = setup(&pairs);
        let cycle = find_loop(&graph).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(7);

        let resolved = collapse(&mut board, &graph, &cycle, &mut rng).unwrap();
        assert_eq!(resolved.len(), 5);
        assert_consistent(&board, &resolved, &pairs);
        assert_eq!(board.get(5).and_then(Square::resolved).map(|m| m.move_index), Some(2));
        assert_eq!(board.get(8).and_then(Square::resolved).map(|m| m.move_index), Some(3));
    }

    #[test]
    fn test_squares_outside_component_untouched() {
        let pairs = [(0, 1), (1, 2), (6, 7), (2, 0)];
        let (_, mut board, graph) = setup(&pairs);
        let cycle = find_loop(&graph).unwrap();
        let before_6 = board.get(6).cloned();
        let before_7 = board.get(7).cloned();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let resolved = collapse(&mut board, &graph, &cycle, &mut rng).unwrap();
        assert_eq!(resolved.len(), 3);
        assert_eq!(board.get(6).cloned(), before_6);
        assert_eq!(board.get(7).cloned(), before_7);
    }

    #[test]
    fn test_triangle_has_two_assignments() {
        let (_, _, graph) = setup(&[(0, 1), (1, 2), (2, 0)]);
        let component = graph.component(0);
        let mut out = Vec::new();
        consistent_assignments(&graph, &component, Assignment::new(graph.len()), &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_both_orientations_reachable() {
        let pairs = [(0, 1), (1, 2), (2, 0)];
        let mut seen = std::collections::HashSet::new();
        for seed in 0..32 {
            let (_, mut board, graph) = setup(&pairs);
            let cycle = find_loop(&graph).unwrap();
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let resolved = collapse(&mut board, &graph, &cycle, &mut rng).unwrap();
            seen.insert(resolved[0].square);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_same_seed_same_collapse() {
        let pairs = [(3, 4), (4, 5), (5, 3)];
        let run = |seed| {
            let (_, mut board, graph) = setup(&pairs);
            let cycle = find_loop(&graph).unwrap();
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            collapse(&mut board, &graph, &cycle, &mut rng).unwrap()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_overconstrained_component_is_invariant_violation() {
        // Four moves over three squares cannot be placed one per square.
        let (_, mut board, graph) = setup(&[(0, 1), (0, 1), (1, 2), (2, 0)]);
        let cycle = find_loop(&graph).unwrap();
        let before = board.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        assert!(collapse(&mut board, &graph, &cycle, &mut rng).is_err());
        assert_eq!(board, before);
    }
}
