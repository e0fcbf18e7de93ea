//! Cyclic-entanglement detection.
//!
//! A collapse is forced only by a closed triangle: three distinct quantum
//! moves touching exactly three squares, each square touched twice. Longer
//! cycles never trigger one.

use super::super::{EdgeId, EntanglementGraph, SQUARE_COUNT};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Three quantum moves closing a triangle over three squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeCycle {
    /// The cycle's edges, in commit order.
    pub edges: [EdgeId; 3],
    /// Ledger indices of the moves behind `edges`.
    pub moves: [usize; 3],
    /// The three squares, in index order.
    pub squares: [usize; 3],
}

/// Finds the first triangle in commit order.
///
/// Combinations are enumerated lexicographically over edge ids, so the
/// earliest-committed moves win when several triangles exist.
#[instrument(skip(graph), fields(edges = graph.len()))]
pub fn find_loop(graph: &EntanglementGraph) -> Option<ThreeCycle> {
    let edges = graph.edges();
    let n = edges.len();

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let mut touched = [0u8; SQUARE_COUNT];
                for edge in [&edges[i], &edges[j], &edges[k]] {
                    for square in edge.squares {
                        touched[square] += 1;
                    }
                }

                let mut squares = touched
                    .iter()
                    .enumerate()
                    .filter(|(_, count)| **count > 0)
                    .map(|(square, count)| (square, *count));
                if let (Some((a, 2)), Some((b, 2)), Some((c, 2)), None) =
                    (squares.next(), squares.next(), squares.next(), squares.next())
                {
                    let cycle = ThreeCycle {
                        edges: [EdgeId(i), EdgeId(j), EdgeId(k)],
                        moves: [edges[i].move_index, edges[j].move_index, edges[k].move_index],
                        squares: [a, b, c],
                    };
                    debug!(?cycle, "Cyclic entanglement found");
                    return Some(cycle);
                }
            }
        }
    }

    debug!("No cyclic entanglement");
    None
}
