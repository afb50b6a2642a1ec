//! Node representation in the knowledge graph

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
///
/// Serializes as a plain string. Ids come from source metadata or are
/// derived from the title/filename by the content loader.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Content type classification
///
/// Open set: anything the source metadata names that is not one of the
/// well-known kinds is carried through as `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    #[default]
    Page,
    Post,
    Book,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Page => "page",
            NodeType::Post => "post",
            NodeType::Book => "book",
            NodeType::Other(s) => s,
        }
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "page" => NodeType::Page,
            "post" => NodeType::Post,
            "book" => NodeType::Book,
            _ => NodeType::Other(s),
        }
    }
}

impl From<&str> for NodeType {
    fn from(s: &str) -> Self {
        NodeType::from(s.to_string())
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Book-specific metadata, present only on reading-list entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookDetails {
    pub author: Option<String>,
    pub rating: Option<f64>,
    pub status: Option<String>,
    pub genre: Option<String>,
}

/// A content item (article, page, or book) in the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    pub title: String,
    pub summary: String,
    /// Kind of content (page, post, book, ...)
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Display order is preserved; matching treats these as a set
    pub tags: Vec<String>,
    /// Published location, used to resolve cross-references
    pub url: String,
    pub published: Option<String>,
    pub updated: Option<String>,
    /// Series name
    pub series: Option<String>,
    /// Position within the series
    pub series_order: Option<i64>,
    #[serde(default)]
    pub book: BookDetails,
}

impl Node {
    /// Create a new node with the given id, title and type
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: String::new(),
            node_type,
            tags: Vec::new(),
            url: String::new(),
            published: None,
            updated: None,
            series: None,
            series_order: None,
            book: BookDetails::default(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_series(mut self, series: impl Into<String>, order: i64) -> Self {
        self.series = Some(series.into());
        self.series_order = Some(order);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.book.author = Some(author.into());
        self
    }

    pub fn is_book(&self) -> bool {
        self.node_type == NodeType::Book
    }
}

/// Body text of a record, held only until links are extracted from it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBody(String);

impl RawBody {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// A loaded record: the node plus the body it was parsed from
#[derive(Debug, Clone)]
pub struct ContentRecord {
    pub node: Node,
    pub body: RawBody,
}

impl ContentRecord {
    pub fn new(node: Node, body: RawBody) -> Self {
        Self { node, body }
    }

    /// A record without body text (reading-list entries)
    pub fn without_body(node: Node) -> Self {
        Self {
            node,
            body: RawBody::default(),
        }
    }

    pub fn into_parts(self) -> (Node, RawBody) {
        (self.node, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_type_round_trips_known_and_open_values() {
        assert_eq!(NodeType::from("book"), NodeType::Book);
        assert_eq!(NodeType::from("recipe"), NodeType::Other("recipe".into()));
        assert_eq!(String::from(NodeType::Other("recipe".into())), "recipe");
    }

    #[test]
    fn blank_id_is_empty() {
        assert!(NodeId::from("   ").is_empty());
        assert!(!NodeId::from("post").is_empty());
    }

    #[test]
    fn record_splits_into_node_and_body() {
        let node = Node::new("a", "A", NodeType::Post);
        let (node, body) = ContentRecord::new(node, RawBody::new("text")).into_parts();
        assert_eq!(node.id.as_str(), "a");
        assert_eq!(body.as_str(), "text");
    }
}
