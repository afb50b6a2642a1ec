//! Same-author relationships between books

use super::{clique_pairs, edges_for_pairs, RelationshipBuilder};
use crate::graph::{Edge, EdgeType, NodeId, NodeRegistry};
use std::collections::HashMap;

pub const SAME_AUTHOR_WEIGHT: f64 = 0.4;

/// Connects every pair of `book` nodes whose `author` strings are
/// identical (case-sensitive).
#[derive(Debug, Default)]
pub struct AuthorRelationshipBuilder;

impl AuthorRelationshipBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl RelationshipBuilder for AuthorRelationshipBuilder {
    fn id(&self) -> &str {
        "same-author"
    }

    fn edge_type(&self) -> EdgeType {
        EdgeType::SameAuthor
    }

    fn propose(&self, registry: &NodeRegistry) -> Vec<Edge> {
        let mut groups: Vec<Vec<NodeId>> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for book in registry.all().filter(|n| n.is_book()) {
            let Some(author) = book.book.author.as_deref() else {
                continue;
            };
            let pos = *positions.entry(author).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[pos].push(book.id.clone());
        }

        groups
            .iter()
            .flat_map(|ids| {
                edges_for_pairs(clique_pairs(ids), EdgeType::SameAuthor, SAME_AUTHOR_WEIGHT)
            })
            .collect()
    }
}
