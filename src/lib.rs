// src/lib.rs

pub mod cli;
pub mod config;
pub mod enrich;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod render;
pub mod source;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::{CliArgs, OutputFormat};
use crate::config::{load_or_default, ConfigFile};
use crate::enrich::Enricher;
use crate::graph::{build_flow_tree, NodeFilter, StageNode};
use crate::source::{DirectorySource, GraphSource, NodeDetailSource};
use crate::types::BuildCoordinates;

pub use crate::graph::build_stage_tree;

/// Fetch a build's flow graph and turn it into the display tree.
///
/// Passes, in order: index, nest, enrich (when `details` is given), filter.
/// `Ok(None)` means the source has no graph data for this build yet.
pub async fn fetch_stage_tree(
    graph_source: &dyn GraphSource,
    details: Option<Arc<dyn NodeDetailSource>>,
    coords: &BuildCoordinates,
    cfg: &ConfigFile,
) -> errors::Result<Option<StageNode>> {
    let Some(raw) = graph_source.fetch_graph(coords).await? else {
        debug!(job = %coords.job_name, build = coords.build_number, "no graph data");
        return Ok(None);
    };

    let Some(mut graph) = build_flow_tree(raw, Some(coords), &cfg.labels)? else {
        return Ok(None);
    };

    if let Some(source) = details {
        let enricher = Enricher::from_settings(&cfg.enrich)?;
        let report = enricher.enrich(&mut graph, source, coords).await;
        info!(
            enriched = report.enriched,
            failed = report.failed.len(),
            "node details merged"
        );
    }

    Ok(Some(NodeFilter::new(&cfg.filter).apply(&graph)))
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the directory-backed sources
/// - the tree passes (plus optional enrichment)
/// - rendering to stdout
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(&args.config)?;
    let coords = BuildCoordinates::new(args.base_url.clone(), args.job.clone(), args.build);
    let source = Arc::new(DirectorySource::new(args.dump_dir.clone()));

    let details: Option<Arc<dyn NodeDetailSource>> = if args.enrich || cfg.enrich.enabled {
        Some(source.clone() as Arc<dyn NodeDetailSource>)
    } else {
        None
    };

    info!(job = %coords.job_name, build = coords.build_number, "building stage tree");

    let Some(tree) = fetch_stage_tree(source.as_ref(), details, &coords, &cfg).await? else {
        eprintln!("no stage data available yet");
        return Ok(());
    };

    let output = match args.format {
        OutputFormat::Text => render::render_text(&tree),
        OutputFormat::Json => render::render_json(&tree)?,
    };
    print!("{output}");

    Ok(())
}
