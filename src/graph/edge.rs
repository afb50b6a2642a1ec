//! Edge representation: typed, weighted, undirected relationships

use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// Kind of relationship an edge records
///
/// Serializes as the lowercase wire name (`same-author` for `SameAuthor`).
/// Unknown names survive a round trip as `Other` so enrichment output that
/// strays from the documented set is carried rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeType {
    /// Explicit cross-reference found in a body
    Link,
    /// Shared tags
    Tag,
    /// Consecutive items of a series
    Series,
    /// Books by the same author
    SameAuthor,
    /// Thematic connection proposed by the enrichment service
    Semantic,
    /// Opposing viewpoints proposed by the enrichment service
    Contrasts,
    /// Reserved; no builder emits it
    Temporal,
    Other(String),
}

impl EdgeType {
    pub fn as_str(&self) -> &str {
        match self {
            EdgeType::Link => "link",
            EdgeType::Tag => "tag",
            EdgeType::Series => "series",
            EdgeType::SameAuthor => "same-author",
            EdgeType::Semantic => "semantic",
            EdgeType::Contrasts => "contrasts",
            EdgeType::Temporal => "temporal",
            EdgeType::Other(s) => s,
        }
    }

    /// Types the enrichment service is asked to produce
    pub fn is_enrichment_type(&self) -> bool {
        matches!(self, EdgeType::Semantic | EdgeType::Contrasts)
    }
}

impl From<String> for EdgeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "link" => EdgeType::Link,
            "tag" => EdgeType::Tag,
            "series" => EdgeType::Series,
            "same-author" => EdgeType::SameAuthor,
            "semantic" => EdgeType::Semantic,
            "contrasts" => EdgeType::Contrasts,
            "temporal" => EdgeType::Temporal,
            _ => EdgeType::Other(s),
        }
    }
}

impl From<&str> for EdgeType {
    fn from(s: &str) -> Self {
        EdgeType::from(s.to_string())
    }
}

impl From<EdgeType> for String {
    fn from(t: EdgeType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An undirected edge between two nodes
///
/// `source`/`target` record the order in which the edge was proposed and
/// carry no direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    /// Relationship strength, nominally 0.0 - 1.0
    pub weight: f64,
    /// Connecting theme, set only by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Edge {
    /// Create a new edge
    pub fn new(source: NodeId, target: NodeId, edge_type: EdgeType, weight: f64) -> Self {
        Self {
            source,
            target,
            edge_type,
            weight,
            theme: None,
        }
    }

    /// Whether this edge joins `a` and `b`, in either orientation
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (self.source == *a && self.target == *b) || (self.source == *b && self.target == *a)
    }

    /// Key identifying the unordered pair plus type
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.source, &self.target, &self.edge_type)
    }
}

/// Orientation-free identity of an edge: `{a, b}` plus type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    low: NodeId,
    high: NodeId,
    edge_type: EdgeType,
}

impl PairKey {
    pub fn new(a: &NodeId, b: &NodeId, edge_type: &EdgeType) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.clone(),
            high: high.clone(),
            edge_type: edge_type.clone(),
        }
    }
}
