//! kgraph CLI: build a knowledge graph document from a content tree.
//!
//! Usage:
//!   kgraph build [--enrich] [-c config.json] [--content dir] [--output graph.json] [-v]
//!   kgraph summary <graph.json>

use clap::{Parser, Subcommand};
use kgraph::{
    AnthropicClient, BuildConfig, ContentLoader, GraphDocument, GraphPipeline,
    SemanticEnrichmentIngestor,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{warn, Level};

/// Environment variable holding the enrichment service credential
const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Parser)]
#[command(
    name = "kgraph",
    version,
    about = "Knowledge graph builder for markdown and reading-list content"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log per-edge and per-line detail
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph document
    Build {
        /// Run the AI semantic enrichment phase (needs ANTHROPIC_API_KEY)
        #[arg(long)]
        enrich: bool,
        /// Path to config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the content directory
        #[arg(long)]
        content: Option<PathBuf>,
        /// Override the output file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print counts from an existing graph document
    Summary {
        /// Path to a graph document
        path: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn enrichment_client() -> Option<AnthropicClient> {
    let api_key = std::env::var(API_KEY_VAR).ok();
    match AnthropicClient::new(api_key) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Could not create enrichment client: {}", e);
            None
        }
    }
}

async fn cmd_build(
    enrich: bool,
    config_path: Option<&Path>,
    content: Option<PathBuf>,
    output: Option<PathBuf>,
) -> i32 {
    let config = match BuildConfig::load(config_path) {
        Ok(config) => config.with_overrides(content, output),
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let output_path = match config.validate() {
        Ok(path) => path.to_path_buf(),
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let records = match ContentLoader::from_config(&config).and_then(|l| l.load_all()) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut pipeline = GraphPipeline::new(config.relationships);
    if enrich {
        if let Some(client) = enrichment_client() {
            let ingestor =
                SemanticEnrichmentIngestor::new(Arc::new(client), config.enrichment.clone());
            pipeline = pipeline.with_enrichment(ingestor);
        }
    }

    let outcome = pipeline.build(records).await;
    if let Err(e) = outcome.document.write_to(&output_path) {
        eprintln!("Error: failed to write {}: {}", output_path.display(), e);
        return 1;
    }

    println!("Graph data written to {}", output_path.display());
    println!(
        "  {} nodes, {} edges{}",
        outcome.report.nodes,
        outcome.report.total_edges,
        if outcome.report.enriched() { " (enriched)" } else { "" }
    );
    0
}

fn cmd_summary(path: &Path) -> i32 {
    let document = match GraphDocument::read_from(path) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", path.display(), e);
            return 1;
        }
    };
    let summary = document.summary();

    println!("Generated: {}", summary.generated.to_rfc3339());
    println!("Enriched:  {}", if summary.enriched { "yes" } else { "no" });
    println!();
    println!("{:<16}  {:>7}", "NODE TYPE", "COUNT");
    println!("{}", "-".repeat(25));
    for (node_type, count) in &summary.nodes_by_type {
        println!("{:<16}  {:>7}", node_type, count);
    }
    println!("{:<16}  {:>7}", "total", summary.node_count);
    println!();
    println!("{:<16}  {:>7}", "EDGE TYPE", "COUNT");
    println!("{}", "-".repeat(25));
    for (edge_type, count) in &summary.edges_by_type {
        println!("{:<16}  {:>7}", edge_type, count);
    }
    println!("{:<16}  {:>7}", "total", summary.edge_count);
    0
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Commands::Build {
            enrich,
            config,
            content,
            output,
        } => cmd_build(enrich, config.as_deref(), content, output).await,
        Commands::Summary { path } => cmd_summary(&path),
    };
    std::process::exit(code);
}
