//! kgraph: Knowledge Graph Builder
//!
//! Turns a corpus of markdown pages, posts and reading-list books into a
//! knowledge graph of typed, weighted, undirected relationships, emitted as a
//! single JSON document for visualization.
//!
//! # Core Concepts
//!
//! - **Nodes**: content items with a stable id, tags, url and optional series/book metadata
//! - **Edges**: at most one per type per unordered node pair, enforced by a single [`EdgeStore`]
//! - **Builders**: deterministic heuristics (links, tags, series, authors) plus an
//!   optional text-generation enrichment phase
//!
//! # Example
//!
//! ```
//! use kgraph::{EdgeStore, EdgeType, Node, NodeRegistry, NodeType};
//!
//! let mut registry = NodeRegistry::new();
//! registry.register(Node::new("a", "A", NodeType::Post)).unwrap();
//!
//! let mut edges = EdgeStore::new();
//! assert!(edges.add("a".into(), "b".into(), EdgeType::Link, 1.0, None));
//! // Same pair, same type: ignored regardless of direction
//! assert!(!edges.add("b".into(), "a".into(), EdgeType::Link, 1.0, None));
//! ```

pub mod builders;
pub mod config;
pub mod enrichment;
mod graph;
pub mod loader;
pub mod pipeline;
pub mod text_gen;

pub use builders::{LinkResolver, RelationshipBuilder};
pub use config::{BuildConfig, ConfigError, ConfigResult, RelationshipOptions};
pub use enrichment::{EnrichmentOutcome, EnrichmentSettings, SemanticEnrichmentIngestor};
pub use graph::{
    BookDetails, ContentRecord, DocumentMetadata, DocumentNode, Edge, EdgeStore, EdgeType,
    GraphAssembler, GraphDocument, GraphError, GraphResult, GraphSummary, Node, NodeId,
    NodeRegistry, NodeType, PairKey, RawBody,
};
pub use loader::{ContentLoader, LoadError, LoadResult};
pub use pipeline::{BuildOutcome, BuildReport, GraphPipeline};
pub use text_gen::{AnthropicClient, GenerationRequest, MockClient, TextGenError, TextGenerationClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
