//! EdgeStore: the single insertion path for edges

use super::edge::{Edge, EdgeType, PairKey};
use super::node::NodeId;
use std::collections::HashSet;

/// Append-only edge collection enforcing one edge per type per node pair
///
/// Every builder and the enrichment phase insert through [`EdgeStore::add`],
/// so the pairwise invariant holds across phases: the first edge of a given
/// type between `{a, b}` wins and later proposals for the same pair and type
/// are dropped, whatever their weight. Edges of different types between the
/// same pair coexist.
#[derive(Debug, Default)]
pub struct EdgeStore {
    edges: Vec<Edge>,
    seen: HashSet<PairKey>,
}

impl EdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edge unless one of the same type already joins the pair.
    ///
    /// Returns `true` if the edge was stored.
    pub fn add(
        &mut self,
        source: NodeId,
        target: NodeId,
        edge_type: EdgeType,
        weight: f64,
        theme: Option<String>,
    ) -> bool {
        let mut edge = Edge::new(source, target, edge_type, weight);
        edge.theme = theme;
        self.insert(edge)
    }

    /// Append a prebuilt edge under the same rule as [`EdgeStore::add`]
    pub fn insert(&mut self, edge: Edge) -> bool {
        if !self.seen.insert(edge.pair_key()) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Insert a batch of edges in order, returning how many were stored
    pub fn extend<I: IntoIterator<Item = Edge>>(&mut self, edges: I) -> usize {
        let mut stored = 0;
        for edge in edges {
            if self.insert(edge) {
                stored += 1;
            }
        }
        stored
    }

    /// Whether an edge of `edge_type` joins `a` and `b` in either orientation
    pub fn contains(&self, a: &NodeId, b: &NodeId, edge_type: &EdgeType) -> bool {
        self.seen.contains(&PairKey::new(a, b, edge_type))
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn count_of(&self, edge_type: &EdgeType) -> usize {
        self.edges.iter().filter(|e| &e.edge_type == edge_type).count()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
