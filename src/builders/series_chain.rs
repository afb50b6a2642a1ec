//! Series relationships: a path through each ordered series

use super::{chain_pairs, edges_for_pairs, RelationshipBuilder};
use crate::graph::{Edge, EdgeType, NodeId, NodeRegistry};
use std::collections::HashMap;

pub const SERIES_WEIGHT: f64 = 0.8;

/// Groups nodes by series name, sorts each group by `series_order`, and
/// links every item to its immediate successor.
///
/// Only nodes with both a series name and an order take part; the loader
/// rejects non-integer orders before they reach the registry. Equal orders
/// keep registration order.
#[derive(Debug, Default)]
pub struct SeriesRelationshipBuilder;

impl SeriesRelationshipBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Series groups in first-seen order, each sorted by position
    fn groups(registry: &NodeRegistry) -> Vec<(String, Vec<NodeId>)> {
        let mut groups: Vec<(String, Vec<(i64, NodeId)>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for node in registry.all() {
            let (Some(series), Some(order)) = (&node.series, node.series_order) else {
                continue;
            };
            let pos = *positions.entry(series.clone()).or_insert_with(|| {
                groups.push((series.clone(), Vec::new()));
                groups.len() - 1
            });
            groups[pos].1.push((order, node.id.clone()));
        }

        groups
            .into_iter()
            .map(|(name, mut items)| {
                items.sort_by_key(|(order, _)| *order);
                (name, items.into_iter().map(|(_, id)| id).collect())
            })
            .collect()
    }
}

impl RelationshipBuilder for SeriesRelationshipBuilder {
    fn id(&self) -> &str {
        "series-chain"
    }

    fn edge_type(&self) -> EdgeType {
        EdgeType::Series
    }

    fn propose(&self, registry: &NodeRegistry) -> Vec<Edge> {
        Self::groups(registry)
            .iter()
            .flat_map(|(_, ids)| edges_for_pairs(chain_pairs(ids), EdgeType::Series, SERIES_WEIGHT))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, NodeType};

    fn part(id: &str, series: &str, order: i64) -> Node {
        Node::new(id, id, NodeType::Post).with_series(series, order)
    }

    fn registry(nodes: Vec<Node>) -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        for node in nodes {
            registry.register(node).unwrap();
        }
        registry
    }

    fn pairs(edges: &[Edge]) -> Vec<(&str, &str)> {
        edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect()
    }

    #[test]
    fn series_is_a_path_not_a_clique() {
        let registry = registry(vec![
            part("three", "tour", 3),
            part("one", "tour", 1),
            part("two", "tour", 2),
        ]);

        let edges = SeriesRelationshipBuilder::new().propose(&registry);
        assert_eq!(pairs(&edges), vec![("one", "two"), ("two", "three")]);
        assert!(edges.iter().all(|e| e.weight == SERIES_WEIGHT));
        assert!(edges.iter().all(|e| e.edge_type == EdgeType::Series));
    }

    #[test]
    fn singleton_series_yields_nothing() {
        let registry = registry(vec![part("solo", "lonely", 1)]);
        assert!(SeriesRelationshipBuilder::new().propose(&registry).is_empty());
    }

    #[test]
    fn nodes_without_order_are_excluded() {
        let mut unordered = Node::new("x", "x", NodeType::Post);
        unordered.series = Some("tour".into());

        let registry = registry(vec![part("a", "tour", 1), unordered, part("b", "tour", 2)]);
        let edges = SeriesRelationshipBuilder::new().propose(&registry);
        assert_eq!(pairs(&edges), vec![("a", "b")]);
    }

    #[test]
    fn separate_series_stay_separate() {
        let registry = registry(vec![
            part("a1", "alpha", 1),
            part("b1", "beta", 1),
            part("a2", "alpha", 2),
            part("b2", "beta", 2),
        ]);

        let edges = SeriesRelationshipBuilder::new().propose(&registry);
        assert_eq!(pairs(&edges), vec![("a1", "a2"), ("b1", "b2")]);
    }
}
