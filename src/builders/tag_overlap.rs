//! Tag-overlap relationships
//!
//! Connects every pair of nodes sharing a tag, weighted by the scaled
//! Jaccard similarity of their tag sets.

use super::{clique_pairs, RelationshipBuilder};
use crate::graph::{Edge, EdgeType, Node, NodeRegistry};
use std::collections::HashSet;

/// Multiplier applied to the Jaccard similarity
pub const TAG_WEIGHT_SCALE: f64 = 0.3;

/// `0.3 × |shared| / |union|` over the two tag sets.
///
/// Returns 0.0 when neither node has tags.
pub fn tag_weight(a: &Node, b: &Node) -> f64 {
    let a_tags: HashSet<&str> = a.tags.iter().map(String::as_str).collect();
    let b_tags: HashSet<&str> = b.tags.iter().map(String::as_str).collect();

    let union = a_tags.union(&b_tags).count();
    if union == 0 {
        return 0.0;
    }
    let shared = a_tags.intersection(&b_tags).count();
    TAG_WEIGHT_SCALE * (shared as f64 / union as f64)
}

/// Walks the tag index in first-seen tag order and proposes a `tag` edge for
/// every pair under each tag.
///
/// A pair sharing several tags is proposed once per shared tag; the edge
/// store keeps the proposal from the first tag walked and ignores the rest,
/// so the stored weight is never averaged or accumulated.
#[derive(Debug, Default)]
pub struct TagRelationshipBuilder;

impl TagRelationshipBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl RelationshipBuilder for TagRelationshipBuilder {
    fn id(&self) -> &str {
        "tag-overlap"
    }

    fn edge_type(&self) -> EdgeType {
        EdgeType::Tag
    }

    fn propose(&self, registry: &NodeRegistry) -> Vec<Edge> {
        let mut edges = Vec::new();

        for (_, ids) in registry.tags() {
            for (a, b) in clique_pairs(ids) {
                let (Some(node_a), Some(node_b)) = (registry.get(a), registry.get(b)) else {
                    continue;
                };
                let weight = tag_weight(node_a, node_b);
                edges.push(Edge::new(a.clone(), b.clone(), EdgeType::Tag, weight));
            }
        }

        edges
    }
}
