use thiserror::Error;

/// Errors that can occur in graph operations
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Node has an empty id (title: {title:?})")]
    EmptyNodeId { title: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
