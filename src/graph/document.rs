//! GraphDocument: the serialized output contract, and its assembler

use super::edge::Edge;
use super::error::GraphResult;
use super::node::{Node, NodeId, NodeType};
use super::registry::NodeRegistry;
use super::store::EdgeStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Node as emitted to consumers
///
/// A projection of [`Node`]: series and book fields stay internal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: NodeId,
    pub title: String,
    pub summary: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub tags: Vec<String>,
    pub url: String,
    pub published: Option<String>,
    pub updated: Option<String>,
}

impl From<&Node> for DocumentNode {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            title: node.title.clone(),
            summary: node.summary.clone(),
            node_type: node.node_type.clone(),
            tags: node.tags.clone(),
            url: node.url.clone(),
            published: node.published.clone(),
            updated: node.updated.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// When the document was assembled
    pub generated: DateTime<Utc>,
    pub node_count: usize,
    pub edge_count: usize,
    /// Whether the enrichment phase ran
    pub enriched: bool,
}

/// The emitted knowledge graph
///
/// Consumers must treat `tags` as ordered, every edge as undirected, and
/// `theme` as optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<DocumentNode>,
    pub edges: Vec<Edge>,
    pub metadata: DocumentMetadata,
}

impl GraphDocument {
    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the document, creating parent directories as needed
    pub fn write_to(&self, path: &Path) -> GraphResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> GraphResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Edge counts keyed by type name
    pub fn edges_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for edge in &self.edges {
            *counts.entry(edge.edge_type.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Node counts keyed by type name
    pub fn nodes_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.node_type.to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            generated: self.metadata.generated,
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            enriched: self.metadata.enriched,
            nodes_by_type: self.nodes_by_type(),
            edges_by_type: self.edges_by_type(),
        }
    }
}

/// Overview of a document, counted from its contents
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSummary {
    pub generated: DateTime<Utc>,
    pub node_count: usize,
    pub edge_count: usize,
    pub enriched: bool,
    pub nodes_by_type: BTreeMap<String, usize>,
    pub edges_by_type: BTreeMap<String, usize>,
}

/// Projects registry and edge state into a [`GraphDocument`]
pub struct GraphAssembler;

impl GraphAssembler {
    /// Assemble a document stamped with the current time
    pub fn assemble(registry: &NodeRegistry, edges: &EdgeStore, enriched: bool) -> GraphDocument {
        Self::assemble_at(registry, edges, enriched, Utc::now())
    }

    pub fn assemble_at(
        registry: &NodeRegistry,
        edges: &EdgeStore,
        enriched: bool,
        generated: DateTime<Utc>,
    ) -> GraphDocument {
        let nodes: Vec<DocumentNode> = registry.all().map(DocumentNode::from).collect();
        let edges = edges.edges().to_vec();

        GraphDocument {
            metadata: DocumentMetadata {
                generated,
                node_count: nodes.len(),
                edge_count: edges.len(),
                enriched,
            },
            nodes,
            edges,
        }
    }
}
