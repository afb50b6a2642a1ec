//! Link resolver
//!
//! Extracts inline markdown references from a record's body and resolves
//! them against the published URLs of registered nodes.

use crate::graph::{Edge, EdgeType, Node, NodeId, NodeRegistry, RawBody};
use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};
use tracing::{debug, info};

/// Weight of every resolved cross-reference
pub const LINK_WEIGHT: f64 = 1.0;

/// How a reference was matched to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Normalized target equals the node URL
    ExactUrl,
    /// Final path segments are equal, directories ignored
    Filename,
    /// One is a `/`-aligned suffix of the other
    PathSuffix,
    /// Target has no directory and the node URL ends with it
    BareSuffix,
}

/// A resolved reference
#[derive(Debug, Clone, Copy)]
pub struct LinkMatch<'a> {
    pub node: &'a Node,
    pub strategy: MatchStrategy,
}

/// Resolves `[label](target)` references to `link` edges.
///
/// Only inline links whose target ends in a document extension are
/// considered; external URLs are ignored. Resolution walks nodes in
/// registration order and takes the first node matching by exact URL,
/// filename or path suffix, so an earlier filename match beats a later exact
/// one. Only when no node matches that way does a bare target fall back to
/// an unanchored suffix pass. Unresolved targets are logged and produce no
/// edge. A node referencing itself yields a self-loop.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    /// Extension used when authoring (rewritten on resolution)
    source_extension: String,
    /// Extension of the published pages
    published_extension: String,
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkResolver {
    pub fn new() -> Self {
        Self {
            source_extension: "md".to_string(),
            published_extension: "html".to_string(),
        }
    }

    /// Produce `link` edges from `source` for every resolvable reference in `body`
    pub fn resolve_links(
        &self,
        source: &NodeId,
        body: &RawBody,
        registry: &NodeRegistry,
    ) -> Vec<Edge> {
        let mut edges = Vec::new();

        for target in self.extract_references(body.as_str()) {
            match self.resolve(&target, registry) {
                Some(found) => {
                    debug!(
                        "{} -> {} via {:?} ({})",
                        source, found.node.id, found.strategy, target
                    );
                    edges.push(Edge::new(
                        source.clone(),
                        found.node.id.clone(),
                        EdgeType::Link,
                        LINK_WEIGHT,
                    ));
                }
                None => info!("Could not find target for link {} from {}", target, source),
            }
        }

        if !edges.is_empty() {
            debug!("{}: found {} links", source, edges.len());
        }
        edges
    }

    /// Targets of inline document links, in body order
    pub fn extract_references(&self, body: &str) -> Vec<String> {
        let parser = Parser::new_ext(body, Options::all());

        let mut references = Vec::new();
        let mut current: Option<(String, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::Link {
                    link_type: LinkType::Inline,
                    dest_url,
                    ..
                }) => {
                    current = Some((dest_url.to_string(), String::new()));
                }
                Event::End(TagEnd::Link) => {
                    if let Some((target, label)) = current.take() {
                        if !label.trim().is_empty() && self.is_document_target(&target) {
                            references.push(target);
                        }
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, label)) = current.as_mut() {
                        label.push_str(&text);
                    }
                }
                _ => {}
            }
        }

        references
    }

    /// Find the node a reference points at
    pub fn resolve<'a>(&self, target: &str, registry: &'a NodeRegistry) -> Option<LinkMatch<'a>> {
        let candidate = self.normalize(target);
        let filename = file_name(&candidate);

        let anchored = registry.all().find_map(|node| {
            let url = node.url.as_str();
            let strategy = if url == candidate {
                MatchStrategy::ExactUrl
            } else if !filename.is_empty() && file_name(url) == filename {
                MatchStrategy::Filename
            } else if is_path_suffix(url, &candidate) || is_path_suffix(&candidate, url) {
                MatchStrategy::PathSuffix
            } else {
                return None;
            };
            Some(LinkMatch { node, strategy })
        });
        if anchored.is_some() || candidate.contains('/') {
            return anchored;
        }

        registry
            .all()
            .find(|node| node.url.ends_with(candidate.as_str()))
            .map(|node| LinkMatch {
                node,
                strategy: MatchStrategy::BareSuffix,
            })
    }

    /// Strip a leading `./` and rewrite the authoring extension to the published one
    pub fn normalize(&self, target: &str) -> String {
        let target = target.strip_prefix("./").unwrap_or(target);
        let source_suffix = format!(".{}", self.source_extension);

        match target.strip_suffix(source_suffix.as_str()) {
            Some(stem) => format!("{}.{}", stem, self.published_extension),
            None => target.to_string(),
        }
    }

    fn is_document_target(&self, target: &str) -> bool {
        if target.contains("://") || target.starts_with("mailto:") {
            return false;
        }
        match file_name(target).rsplit_once('.') {
            Some((_, ext)) => ext == self.source_extension || ext == self.published_extension,
            None => false,
        }
    }
}

/// Final `/`-separated segment
fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Whether `suffix` ends `path` at a `/` boundary
fn is_path_suffix(path: &str, suffix: &str) -> bool {
    !suffix.is_empty()
        && path.len() > suffix.len()
        && path.ends_with(suffix)
        && path[..path.len() - suffix.len()].ends_with('/')
}
