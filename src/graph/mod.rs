//! Core graph data structures

mod document;
mod edge;
mod error;
mod node;
mod registry;
mod store;


pub use document::{DocumentMetadata, DocumentNode, GraphAssembler, GraphDocument, GraphSummary};
pub use edge::{Edge, EdgeType, PairKey};
pub use error::{GraphError, GraphResult};
pub use node::{BookDetails, ContentRecord, Node, NodeId, NodeType, RawBody};
pub use registry::NodeRegistry;
pub use store::EdgeStore;
