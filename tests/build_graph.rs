//! End-to-end builds over the fixture site

mod common;

use common::{FixtureSite, BOOK_IDS, POST_IDS};
use kgraph::{
    BuildConfig, ContentLoader, EdgeType, EnrichmentSettings, GraphDocument, GraphPipeline,
    MockClient, NodeId, SemanticEnrichmentIngestor,
};
use std::collections::HashSet;
use std::sync::Arc;

fn weight_between(doc: &GraphDocument, a: &str, b: &str, edge_type: &EdgeType) -> Option<f64> {
    let (a, b) = (NodeId::from(a), NodeId::from(b));
    doc.edges
        .iter()
        .find(|e| &e.edge_type == edge_type && e.connects(&a, &b))
        .map(|e| e.weight)
}

async fn build(site: &FixtureSite) -> GraphDocument {
    let config = site.config();
    let records = site.loader().load_all().unwrap();
    GraphPipeline::new(config.relationships)
        .build(records)
        .await
        .document
}

#[test]
fn loader_reads_fixture_site() {
    let site = FixtureSite::create();
    let records = site.loader().load_all().unwrap();

    let ids: Vec<_> = records.iter().map(|r| r.node.id.as_str().to_string()).collect();
    let mut expected: Vec<String> = BOOK_IDS.iter().map(|s| s.to_string()).collect();
    expected.push("about".to_string());
    expected.extend(POST_IDS.iter().map(|s| s.to_string()));
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn full_build_over_fixture_site() {
    let site = FixtureSite::create();
    let doc = build(&site).await;

    assert_eq!(doc.metadata.node_count, 7);
    assert!(!doc.metadata.enriched);

    let counts = doc.edges_by_type();
    assert_eq!(counts.get("link"), Some(&2));
    assert_eq!(counts.get("tag"), Some(&6));
    assert_eq!(counts.get("series"), Some(&2));
    assert_eq!(counts.get("same-author"), Some(&1));
    assert_eq!(doc.metadata.edge_count, 11);

    // Tag weight is the scaled Jaccard of the pair's whole tag sets
    let w = weight_between(&doc, "ownership", "lifetimes", &EdgeType::Tag).unwrap();
    assert!((w - 0.2).abs() < 1e-9);
    let w = weight_between(&doc, "getting-started", "lifetimes", &EdgeType::Tag).unwrap();
    assert!((w - 0.075).abs() < 1e-9);

    // Series is a path, not a clique
    assert!(weight_between(&doc, "getting-started", "ownership", &EdgeType::Series).is_some());
    assert!(weight_between(&doc, "ownership", "lifetimes", &EdgeType::Series).is_some());
    assert!(weight_between(&doc, "getting-started", "lifetimes", &EdgeType::Series).is_none());

    // `../about.md` resolves by filename
    assert_eq!(
        weight_between(&doc, "getting-started", "about", &EdgeType::Link),
        Some(1.0)
    );

    assert_eq!(
        weight_between(&doc, "book-dune", "book-children-of-dune", &EdgeType::SameAuthor),
        Some(0.4)
    );
}

#[tokio::test]
async fn at_most_one_edge_per_pair_and_type() {
    let site = FixtureSite::create();
    let doc = build(&site).await;

    let keys: HashSet<_> = doc.edges.iter().map(|e| e.pair_key()).collect();
    assert_eq!(keys.len(), doc.edges.len());
}

#[tokio::test]
async fn written_document_reads_back_unchanged() {
    let site = FixtureSite::create();
    let doc = build(&site).await;

    let path = site.output_path();
    doc.write_to(&path).unwrap();
    let back = GraphDocument::read_from(&path).unwrap();

    let ids = |d: &GraphDocument| d.nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&back), ids(&doc));
    assert_eq!(back.edges.len(), doc.edges.len());
    for (a, b) in back.edges.iter().zip(&doc.edges) {
        assert!((a.weight - b.weight).abs() < 1e-9);
    }
    assert_eq!(back.metadata, doc.metadata);
}

#[tokio::test]
async fn config_file_drives_the_build() {
    let site = FixtureSite::create();
    let config_path = site.root().join("config.json");
    let json = serde_json::json!({
        "contentPath": site.content_path(),
        "filePatterns": ["blog/*.md"],
        "outputPath": site.output_path(),
        "relationships": { "detectLinks": false }
    });
    std::fs::write(&config_path, json.to_string()).unwrap();

    let config = BuildConfig::load(Some(&config_path)).unwrap();
    assert!(config.validate().is_ok());

    let records = ContentLoader::from_config(&config).unwrap().load_all().unwrap();
    assert_eq!(records.len(), 3);

    let doc = GraphPipeline::new(config.relationships).build(records).await.document;
    let counts = doc.edges_by_type();
    assert_eq!(counts.get("link"), None);
    assert_eq!(counts.get("tag"), Some(&3));
    assert_eq!(counts.get("series"), Some(&2));
}

#[tokio::test]
async fn enrichment_over_fixture_site() {
    let site = FixtureSite::create();
    let records = site.loader().load_all().unwrap();

    let client = Arc::new(
        MockClient::available()
            .with_response(
                "Here is what I found:\n\
RELATIONSHIP: book-dune -> book-neuromancer | semantic | 0.7 | THEME: scifi worldbuilding\n\
RELATIONSHIP: book-dune -> no-such-book | semantic | 0.9 | THEME: imaginary",
            )
            .with_response(
                "RELATIONSHIP: ownership -> lifetimes | contrasts | 0.4 | THEME: borrowing rules\n\
RELATIONSHIP: ownership -> lifetimes | semantic | 3.5 | THEME: out of range",
            ),
    );
    let settings = EnrichmentSettings {
        batch_size: 4,
        ..EnrichmentSettings::default()
    };
    let ingestor = SemanticEnrichmentIngestor::new(client.clone(), settings);

    let outcome = GraphPipeline::new(site.config().relationships)
        .with_enrichment(ingestor)
        .build(records)
        .await;
    let doc = outcome.document;

    assert!(doc.metadata.enriched);
    assert_eq!(client.requests().len(), 2);

    let counts = doc.edges_by_type();
    assert_eq!(counts.get("semantic"), Some(&1));
    assert_eq!(counts.get("contrasts"), Some(&1));
    assert_eq!(doc.metadata.edge_count, 13);

    let semantic = doc
        .edges
        .iter()
        .find(|e| e.edge_type == EdgeType::Semantic)
        .unwrap();
    assert_eq!(semantic.theme.as_deref(), Some("scifi worldbuilding"));
}
