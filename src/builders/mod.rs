//! Relationship builders
//!
//! Deterministic heuristics that derive edges from node attributes, plus the
//! link resolver that derives them from body text. Builders are pure: they
//! read the registry and return proposed edges. The pipeline funnels every
//! proposal through `EdgeStore::add`, which owns deduplication.
//!
//! Builders run in a fixed order (tags, series, authors). Because the store
//! keeps the first edge per pair and type, reordering changes output.

mod link_resolver;
mod same_author;
mod series_chain;
mod tag_overlap;

pub use link_resolver::{LinkMatch, LinkResolver, MatchStrategy, LINK_WEIGHT};
pub use same_author::{AuthorRelationshipBuilder, SAME_AUTHOR_WEIGHT};
pub use series_chain::{SeriesRelationshipBuilder, SERIES_WEIGHT};
pub use tag_overlap::{tag_weight, TagRelationshipBuilder, TAG_WEIGHT_SCALE};

use crate::graph::{Edge, EdgeType, NodeId, NodeRegistry};

/// A deterministic heuristic that proposes edges of one type.
pub trait RelationshipBuilder: Send + Sync {
    /// Stable identifier used in logs and build reports.
    fn id(&self) -> &str;

    /// The edge type every proposal carries.
    fn edge_type(&self) -> EdgeType;

    /// Propose edges from the current registry, in insertion order.
    ///
    /// Proposals may repeat a pair; the edge store keeps the first.
    fn propose(&self, registry: &NodeRegistry) -> Vec<Edge>;
}

/// Every unordered pair `(items[i], items[j])` with `i < j`.
pub(crate) fn clique_pairs<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> + '_ {
    items
        .iter()
        .enumerate()
        .flat_map(move |(i, a)| items[i + 1..].iter().map(move |b| (a, b)))
}

/// Each item paired with its immediate successor.
pub(crate) fn chain_pairs<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> + '_ {
    items.windows(2).map(|w| (&w[0], &w[1]))
}

pub(crate) fn edges_for_pairs<'a, I>(pairs: I, edge_type: EdgeType, weight: f64) -> Vec<Edge>
where
    I: Iterator<Item = (&'a NodeId, &'a NodeId)>,
{
    pairs
        .map(|(a, b)| Edge::new(a.clone(), b.clone(), edge_type.clone(), weight))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clique_pairs_of_three() {
        let pairs: Vec<_> = clique_pairs(&[1, 2, 3]).map(|(a, b)| (*a, *b)).collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn chain_pairs_of_three() {
        let pairs: Vec<_> = chain_pairs(&[1, 2, 3]).map(|(a, b)| (*a, *b)).collect();
        assert_eq!(pairs, vec![(1, 2), (2, 3)]);
    }

    #[test]
    fn singletons_produce_no_pairs() {
        assert_eq!(clique_pairs(&[1]).count(), 0);
        assert_eq!(chain_pairs(&[1]).count(), 0);
        assert_eq!(chain_pairs::<i32>(&[]).count(), 0);
    }
}
