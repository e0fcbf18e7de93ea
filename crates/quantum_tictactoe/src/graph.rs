//! Entanglement graph derived from the still-pending quantum moves.
//!
//! Nodes are squares holding at least one pending mark, edges are quantum
//! moves. Both live in flat arenas addressed by index so a square can be
//! entangled with any number of moves without reference cycles. Edge order
//! follows commit order and node order follows square index, which keeps
//! loop detection reproducible.

use super::{Board, Ledger, Player, SQUARE_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Index of an edge in [`EntanglementGraph::edges`].
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
    derive_more::Display,
    derive_more::From,
)]
pub struct EdgeId(pub usize);

/// A quantum move seen as an edge between its two squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Edge {
    /// Ledger index of the owning move.
    pub move_index: usize,
    /// Owner of the move.
    pub player: Player,
    /// Turn subscript of the move.
    pub turn: u32,
    /// The two squares the move spans.
    pub squares: [usize; 2],
}

impl Edge {
    /// The endpoint opposite `square`.
    pub fn other(&self, square: usize) -> usize {
        if self.squares[0] == square {
            self.squares[1]
        } else {
            self.squares[0]
        }
    }

    /// Whether the edge touches `square`.
    pub fn touches(&self, square: usize) -> bool {
        self.squares.contains(&square)
    }
}

/// A maximal connected set of entangled squares and the moves linking them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Squares in index order.
    pub squares: Vec<usize>,
    /// Edges in commit order.
    pub edges: Vec<EdgeId>,
}

/// Graph of squares linked by pending quantum moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntanglementGraph {
    nodes: Vec<usize>,
    edges: Vec<Edge>,
    adjacency: [Vec<EdgeId>; SQUARE_COUNT],
}

impl EntanglementGraph {
    /// Rebuilds the graph from the ledger, keeping only quantum moves whose
    /// marks are still pending on the board.
    #[instrument(skip_all, fields(moves = ledger.len()))]
    pub fn rebuild(ledger: &Ledger, board: &Board) -> Self {
        let mut graph = Self::default();

        for (index, mv) in ledger.quantum_moves() {
            let [a, b] = mv.squares();
            if !(board.has_pending(a, index) && board.has_pending(b, index)) {
                continue;
            }
            let id = EdgeId(graph.edges.len());
            graph.edges.push(Edge::new(index, mv.player(), mv.turn(), [a, b]));
            graph.adjacency[a].push(id);
            graph.adjacency[b].push(id);
        }

        graph.nodes = (0..SQUARE_COUNT)
            .filter(|&pos| board.get(pos).is_some_and(|sq| !sq.pending().is_empty()))
            .collect();

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Entanglement graph rebuilt"
        );
        graph
    }

    /// Squares holding pending marks, in index order.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Edges in commit order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up an edge.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    /// Edges touching `square`, in commit order.
    pub fn incident(&self, square: usize) -> &[EdgeId] {
        self.adjacency.get(square).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The entangled component containing `square`.
    ///
    /// A square with no pending marks forms a component on its own.
    #[instrument(skip(self))]
    pub fn component(&self, square: usize) -> Component {
        let mut seen = [false; SQUARE_COUNT];
        let mut edge_seen = vec![false; self.edges.len()];
        let mut queue = VecDeque::from([square]);
        let mut edges = Vec::new();
        if let Some(flag) = seen.get_mut(square) {
            *flag = true;
        }

        while let Some(current) = queue.pop_front() {
            for &id in self.incident(current) {
                if edge_seen[id.0] {
                    continue;
                }
                edge_seen[id.0] = true;
                edges.push(id);
                let next = self.edges[id.0].other(current);
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }

        edges.sort();
        let squares = (0..SQUARE_COUNT).filter(|&pos| seen[pos]).collect();
        Component { squares, edges }
    }

    /// Whether a new quantum move between `a` and `b` keeps every component
    /// collapsible, i.e. no more moves than squares.
    #[instrument(skip(self))]
    pub fn can_entangle(&self, a: usize, b: usize) -> bool {
        let first = self.component(a);
        if first.squares.contains(&b) {
            return first.edges.len() < first.squares.len();
        }
        let second = self.component(b);
        first.edges.len() + second.edges.len() < first.squares.len() + second.squares.len()
    }
}
