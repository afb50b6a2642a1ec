//! NodeRegistry: node identity and the tag index

use super::error::{GraphError, GraphResult};
use super::node::{Node, NodeId};
use std::collections::{HashMap, HashSet};

/// Keyed node store with a tag → nodes index
///
/// Nodes are kept in registration order. Registering an id that is
/// already present **replaces** the stored node in place (keeping its
/// original position) and returns the previous value; no error is raised.
/// Content with colliding ids therefore silently loses all but the last
/// registration, which callers can detect from the return value.
///
/// The tag index is append-only. An overwritten node's tags stay indexed
/// under its id, and a tag carried by both registrations lists the id twice.
/// Tag pairs built from the index can therefore include stale pairs and
/// self-pairs after a collision.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    positions: HashMap<NodeId, usize>,
    /// Tags in first-seen order, each with its node ids in first-seen order
    tag_index: Vec<(String, Vec<NodeId>)>,
    tag_positions: HashMap<String, usize>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node, indexing its tags.
    ///
    /// Returns the node previously registered under the same id, if any.
    /// A node with a blank id is rejected.
    pub fn register(&mut self, node: Node) -> GraphResult<Option<Node>> {
        if node.id.is_empty() {
            return Err(GraphError::EmptyNodeId { title: node.title });
        }

        let previous = match self.positions.get(&node.id) {
            Some(&pos) => Some(std::mem::replace(&mut self.nodes[pos], node.clone())),
            None => {
                self.positions.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node.clone());
                None
            }
        };

        self.index(&node);
        Ok(previous)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.positions.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.positions.contains_key(id)
    }

    /// All nodes in registration order
    pub fn all(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Ids of nodes carrying `tag`, in first-seen order
    pub fn by_tag(&self, tag: &str) -> &[NodeId] {
        self.tag_positions
            .get(tag)
            .map(|&pos| self.tag_index[pos].1.as_slice())
            .unwrap_or(&[])
    }

    /// Every indexed tag with its nodes, in first-seen tag order
    pub fn tags(&self) -> impl Iterator<Item = (&str, &[NodeId])> {
        self.tag_index
            .iter()
            .map(|(tag, ids)| (tag.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn index(&mut self, node: &Node) {
        // Tags are a set for matching; a repeated tag on one node indexes once
        let mut seen = HashSet::new();
        for tag in &node.tags {
            if !seen.insert(tag.as_str()) {
                continue;
            }
            let pos = match self.tag_positions.get(tag) {
                Some(&pos) => pos,
                None => {
                    self.tag_positions.insert(tag.clone(), self.tag_index.len());
                    self.tag_index.push((tag.clone(), Vec::new()));
                    self.tag_index.len() - 1
                }
            };
            self.tag_index[pos].1.push(node.id.clone());
        }
    }
}
