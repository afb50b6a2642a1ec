//! Semantic enrichment phase
//!
//! Delegates discovery of `semantic`/`contrasts` edges to an external
//! text-generation service. Runs after the deterministic builders.
//!
//! The ingestor:
//! 1. Checks the client is available (credential present); otherwise skips
//! 2. Splits all nodes into fixed-size batches
//! 3. Sends one request per batch, strictly one at a time
//! 4. Parses each reply line-by-line and inserts accepted relationships
//!    through the shared `EdgeStore`
//!
//! A failed call ends the phase; edges already inserted are kept.

mod prompt;
mod response;

pub use prompt::build_prompt;
pub use response::{parse_line, parse_response, LineRejection, ProposedRelationship};

use crate::graph::{EdgeStore, Node, NodeRegistry};
use crate::text_gen::{GenerationRequest, TextGenerationClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Settings for the enrichment phase (`enrichment` section of the config)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnrichmentSettings {
    pub model: String,
    /// Nodes per request; at least 1
    pub batch_size: usize,
    pub max_tokens: u32,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// How the enrichment phase ended
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// Not run at all (no credential / service unavailable)
    Skipped { reason: String },
    /// Every batch was processed
    Completed { batches: usize, edges_added: usize },
    /// A call failed; later batches were not sent
    Aborted {
        batches_completed: usize,
        edges_added: usize,
        error: String,
    },
}

impl EnrichmentOutcome {
    /// Whether the phase ran (requests were attempted)
    pub fn ran(&self) -> bool {
        !matches!(self, EnrichmentOutcome::Skipped { .. })
    }

    pub fn edges_added(&self) -> usize {
        match self {
            EnrichmentOutcome::Skipped { .. } => 0,
            EnrichmentOutcome::Completed { edges_added, .. }
            | EnrichmentOutcome::Aborted { edges_added, .. } => *edges_added,
        }
    }
}

/// Counts from ingesting one reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Relationship lines seen
    pub lines: usize,
    /// Edges newly stored
    pub added: usize,
    /// Valid lines whose edge already existed
    pub duplicates: usize,
    /// Lines naming an id not in the registry
    pub unknown_ids: usize,
    /// Lines that broke the grammar or the weight guard
    pub rejected: usize,
}

/// Optional phase turning service replies into edges
pub struct SemanticEnrichmentIngestor {
    client: Arc<dyn TextGenerationClient>,
    settings: EnrichmentSettings,
}

impl SemanticEnrichmentIngestor {
    pub fn new(client: Arc<dyn TextGenerationClient>, settings: EnrichmentSettings) -> Self {
        Self { client, settings }
    }

    /// Run the phase over every registered node.
    pub async fn enrich(&self, registry: &NodeRegistry, store: &mut EdgeStore) -> EnrichmentOutcome {
        if !self.client.is_available().await {
            let reason = "text generation service credential not configured".to_string();
            warn!("Skipping AI enrichment: {}", reason);
            return EnrichmentOutcome::Skipped { reason };
        }

        let nodes: Vec<&Node> = registry.all().collect();
        let batch_size = self.settings.batch_size.max(1);
        let total_batches = nodes.len().div_ceil(batch_size);

        info!(
            "Enriching {} nodes in {} batches of up to {}",
            nodes.len(),
            total_batches,
            batch_size
        );

        let mut edges_added = 0;
        for (index, batch) in nodes.chunks(batch_size).enumerate() {
            info!("Processing batch {}/{}", index + 1, total_batches);

            let request = GenerationRequest {
                model: self.settings.model.clone(),
                max_tokens: self.settings.max_tokens,
                prompt: build_prompt(batch),
            };

            let reply = match self.client.generate(&request).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!("Error during AI enrichment (batch {}): {}", index + 1, e);
                    return EnrichmentOutcome::Aborted {
                        batches_completed: index,
                        edges_added,
                        error: e.to_string(),
                    };
                }
            };

            let stats = ingest_response(&reply, registry, store);
            debug!("Batch {} reply: {:?}", index + 1, stats);
            edges_added += stats.added;
        }

        info!("AI enrichment complete: {} edges added", edges_added);
        EnrichmentOutcome::Completed {
            batches: total_batches,
            edges_added,
        }
    }
}

/// Parse a reply and insert every acceptable relationship.
///
/// A relationship is accepted only when both ids are registered. Rejected
/// and unknown-id lines are skipped individually.
pub fn ingest_response(reply: &str, registry: &NodeRegistry, store: &mut EdgeStore) -> IngestStats {
    let mut stats = IngestStats::default();

    for (line_no, parsed) in parse_response(reply) {
        stats.lines += 1;

        let rel = match parsed {
            Ok(rel) => rel,
            Err(rejection @ LineRejection::WeightOutOfRange(_)) => {
                warn!("Rejected enrichment line {}: {}", line_no, rejection);
                stats.rejected += 1;
                continue;
            }
            Err(rejection) => {
                debug!("Skipped enrichment line {}: {}", line_no, rejection);
                stats.rejected += 1;
                continue;
            }
        };

        if !registry.contains(&rel.source) || !registry.contains(&rel.target) {
            debug!(
                "Skipped enrichment line {}: unknown id in {} -> {}",
                line_no, rel.source, rel.target
            );
            stats.unknown_ids += 1;
            continue;
        }

        if !rel.edge_type.is_enrichment_type() {
            warn!(
                "Enrichment proposed unexpected relationship type '{}' for {} -> {}",
                rel.edge_type, rel.source, rel.target
            );
        }

        let (source, target, edge_type) = (rel.source.clone(), rel.target.clone(), rel.edge_type.clone());
        if store.add(rel.source, rel.target, rel.edge_type, rel.weight, rel.theme) {
            debug!("Added {} relationship: {} -> {}", edge_type, source, target);
            stats.added += 1;
        } else {
            stats.duplicates += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeType, NodeType};
    use crate::text_gen::{MockClient, TextGenError};

    fn registry(ids: &[&str]) -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        for id in ids {
            registry
                .register(Node::new(*id, id.to_uppercase(), NodeType::Post))
                .unwrap();
        }
        registry
    }

    fn settings(batch_size: usize) -> EnrichmentSettings {
        EnrichmentSettings {
            batch_size,
            ..EnrichmentSettings::default()
        }
    }

    const REPLY: &str = "RELATIONSHIP: a -> b | semantic | 0.6 | THEME: shared craft\n\
RELATIONSHIP: a -> ghost | semantic | 0.9 | THEME: nobody";

    #[test]
    fn known_ids_accepted_unknown_skipped() {
        let registry = registry(&["a", "b"]);
        let mut store = EdgeStore::new();

        let stats = ingest_response(REPLY, &registry, &mut store);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.unknown_ids, 1);

        assert_eq!(store.len(), 1);
        let edge = &store.edges()[0];
        assert_eq!(edge.edge_type, EdgeType::Semantic);
        assert_eq!(edge.theme.as_deref(), Some("shared craft"));
        assert_eq!(edge.weight, 0.6);
    }

    #[test]
    fn reprocessing_same_reply_adds_nothing() {
        let registry = registry(&["a", "b"]);
        let mut store = EdgeStore::new();

        ingest_response(REPLY, &registry, &mut store);
        let again = ingest_response(REPLY, &registry, &mut store);

        assert_eq!(again.added, 0);
        assert_eq!(again.duplicates, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn enrichment_edge_coexists_with_heuristic_edge() {
        let registry = registry(&["a", "b"]);
        let mut store = EdgeStore::new();
        store.add("b".into(), "a".into(), EdgeType::Tag, 0.1, None);

        let stats = ingest_response(REPLY, &registry, &mut store);
        assert_eq!(stats.added, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn out_of_range_weight_is_not_stored() {
        let registry = registry(&["a", "b"]);
        let mut store = EdgeStore::new();

        let stats = ingest_response("RELATIONSHIP: a -> b | semantic | 7", &registry, &mut store);
        assert_eq!(stats.rejected, 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn batches_are_sent_in_order() {
        let registry = registry(&["a", "b", "c", "d", "e"]);
        let client = Arc::new(
            MockClient::available()
                .with_response("RELATIONSHIP: a -> b | semantic | 0.5")
                .with_response("RELATIONSHIP: c -> d | contrasts | 0.4")
                .with_response("nothing useful"),
        );
        let ingestor = SemanticEnrichmentIngestor::new(client.clone(), settings(2));

        let mut store = EdgeStore::new();
        let outcome = ingestor.enrich(&registry, &mut store).await;

        assert_eq!(
            outcome,
            EnrichmentOutcome::Completed {
                batches: 3,
                edges_added: 2
            }
        );
        let requests = client.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].prompt.contains("ID: a") && requests[0].prompt.contains("ID: b"));
        assert!(requests[2].prompt.contains("ID: e") && !requests[2].prompt.contains("ID: a"));
    }

    #[tokio::test]
    async fn failed_batch_aborts_but_keeps_earlier_edges() {
        let registry = registry(&["a", "b", "c", "d"]);
        let client = Arc::new(
            MockClient::available()
                .with_response("RELATIONSHIP: a -> b | semantic | 0.5")
                .with_failure(TextGenError::Unavailable("connection reset".to_string()))
                .with_response("RELATIONSHIP: c -> d | semantic | 0.5"),
        );
        let ingestor = SemanticEnrichmentIngestor::new(client.clone(), settings(1));

        let mut store = EdgeStore::new();
        store.add("c".into(), "d".into(), EdgeType::Tag, 0.3, None);
        let outcome = ingestor.enrich(&registry, &mut store).await;

        assert!(matches!(
            outcome,
            EnrichmentOutcome::Aborted {
                batches_completed: 1,
                edges_added: 1,
                ..
            }
        ));
        assert!(outcome.ran());
        assert_eq!(client.requests().len(), 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn unavailable_client_skips_phase() {
        let registry = registry(&["a", "b"]);
        let client = Arc::new(MockClient::unavailable());
        let ingestor = SemanticEnrichmentIngestor::new(client.clone(), settings(10));

        let mut store = EdgeStore::new();
        let outcome = ingestor.enrich(&registry, &mut store).await;

        assert!(!outcome.ran());
        assert!(client.requests().is_empty());
        assert!(store.is_empty());
    }
}
