//! Build pipeline
//!
//! Runs the phases strictly in order over a single registry and edge store:
//!
//! 1. Register every record; bodies go to a side table keyed by id
//! 2. Resolve links from each body, now that every node exists
//! 3. Deterministic builders: tags, series, authors (fixed order)
//! 4. Optional semantic enrichment
//! 5. Assemble the document
//!
//! No phase failure propagates: the pipeline always reaches assembly with
//! whatever edges were produced.

use crate::builders::{
    AuthorRelationshipBuilder, LinkResolver, RelationshipBuilder, SeriesRelationshipBuilder,
    TagRelationshipBuilder,
};
use crate::config::RelationshipOptions;
use crate::enrichment::{EnrichmentOutcome, SemanticEnrichmentIngestor};
use crate::graph::{
    ContentRecord, EdgeStore, GraphAssembler, GraphDocument, NodeId, NodeRegistry, RawBody,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What each phase did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Records offered to the registry
    pub records: usize,
    /// Records refused by the registry (blank id)
    pub rejected: usize,
    /// Registrations that replaced an earlier node with the same id
    pub overwritten: usize,
    pub nodes: usize,
    pub link_edges: usize,
    /// Edges stored per builder id, in run order
    pub builder_edges: Vec<(String, usize)>,
    /// `None` when enrichment was not requested
    pub enrichment: Option<EnrichmentOutcome>,
    pub total_edges: usize,
}

impl BuildReport {
    /// Whether the enrichment phase ran
    pub fn enriched(&self) -> bool {
        self.enrichment.as_ref().is_some_and(EnrichmentOutcome::ran)
    }
}

/// Result of a full build
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub document: GraphDocument,
    pub report: BuildReport,
}

/// Sequential graph build over a set of content records
pub struct GraphPipeline {
    options: RelationshipOptions,
    link_resolver: LinkResolver,
    builders: Vec<Box<dyn RelationshipBuilder>>,
    enrichment: Option<SemanticEnrichmentIngestor>,
}

impl GraphPipeline {
    pub fn new(options: RelationshipOptions) -> Self {
        let mut builders: Vec<Box<dyn RelationshipBuilder>> = Vec::new();
        if options.detect_tags {
            builders.push(Box::new(TagRelationshipBuilder::new()));
        }
        if options.detect_series {
            builders.push(Box::new(SeriesRelationshipBuilder::new()));
        }
        builders.push(Box::new(AuthorRelationshipBuilder::new()));

        Self {
            options,
            link_resolver: LinkResolver::new(),
            builders,
            enrichment: None,
        }
    }

    /// Enable the enrichment phase
    pub fn with_enrichment(mut self, ingestor: SemanticEnrichmentIngestor) -> Self {
        self.enrichment = Some(ingestor);
        self
    }

    /// Ids of the deterministic builders, in run order
    pub fn builder_ids(&self) -> Vec<&str> {
        self.builders.iter().map(|b| b.id()).collect()
    }

    pub async fn build(&self, records: Vec<ContentRecord>) -> BuildOutcome {
        let mut report = BuildReport {
            records: records.len(),
            ..BuildReport::default()
        };
        let mut registry = NodeRegistry::new();
        let mut store = EdgeStore::new();

        info!("Phase 1: registering {} records", records.len());
        let bodies = Self::register_all(records, &mut registry, &mut report);
        report.nodes = registry.len();

        if self.options.detect_links {
            info!("Phase 2: resolving links");
            report.link_edges = self.resolve_links(bodies, &registry, &mut store);
        }

        info!("Phase 3: relationship builders");
        for builder in &self.builders {
            let added = store.extend(builder.propose(&registry));
            info!("{}: {} {} edges", builder.id(), added, builder.edge_type());
            report.builder_edges.push((builder.id().to_string(), added));
        }

        if let Some(ingestor) = &self.enrichment {
            info!("Phase 4: semantic enrichment");
            report.enrichment = Some(ingestor.enrich(&registry, &mut store).await);
        }

        report.total_edges = store.len();
        info!(
            "Final stats: {} nodes, {} edges",
            registry.len(),
            store.len()
        );

        let document = GraphAssembler::assemble(&registry, &store, report.enriched());
        BuildOutcome { document, report }
    }

    /// Register records in order, returning bodies keyed by node id.
    ///
    /// A later record with the same id replaces both the node and its body.
    fn register_all(
        records: Vec<ContentRecord>,
        registry: &mut NodeRegistry,
        report: &mut BuildReport,
    ) -> HashMap<NodeId, RawBody> {
        let mut bodies = HashMap::new();

        for record in records {
            let (node, body) = record.into_parts();
            let id = node.id.clone();
            match registry.register(node) {
                Ok(Some(previous)) => {
                    warn!(
                        "Duplicate node id '{}': '{}' replaced by a later record",
                        id, previous.title
                    );
                    report.overwritten += 1;
                    bodies.insert(id, body);
                }
                Ok(None) => {
                    bodies.insert(id, body);
                }
                Err(e) => {
                    warn!("Skipping record: {}", e);
                    report.rejected += 1;
                }
            }
        }

        bodies
    }

    fn resolve_links(
        &self,
        mut bodies: HashMap<NodeId, RawBody>,
        registry: &NodeRegistry,
        store: &mut EdgeStore,
    ) -> usize {
        let mut added = 0;
        for node in registry.all() {
            let Some(body) = bodies.remove(&node.id) else {
                continue;
            };
            if body.is_empty() {
                continue;
            }
            let edges = self.link_resolver.resolve_links(&node.id, &body, registry);
            added += store.extend(edges);
        }
        debug!("Link phase stored {} edges", added);
        added
    }
}
