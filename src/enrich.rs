// src/enrich.rs

//! Optional enrichment of atomic steps with per-node detail.
//!
//! Runs between tree construction and filtering. Details are fetched with
//! bounded concurrency; a failed fetch leaves its node untouched.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use regex::Regex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::model::EnrichSection;
use crate::errors::{Result, StageTreeError};
use crate::graph::{FlowGraph, GraphNode, NodeIdx};
use crate::source::{NodeDetail, NodeDetailSource};
use crate::types::{BuildCoordinates, StructuralKind};

/// Outcome of one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Number of atomic steps a detail was requested for.
    pub requested: usize,
    pub enriched: usize,
    /// `(node id, error message)` for every fetch that failed.
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct Enricher {
    concurrency: usize,
    strip_description: Regex,
}

impl Enricher {
    pub fn new(concurrency: usize, strip_description: Regex) -> Self {
        Self {
            concurrency: concurrency.max(1),
            strip_description,
        }
    }

    pub fn from_settings(settings: &EnrichSection) -> Result<Self> {
        let strip = Regex::new(&settings.strip_description_pattern).map_err(|e| {
            StageTreeError::ConfigError(format!(
                "invalid [enrich].strip_description_pattern: {e}"
            ))
        })?;
        Ok(Self::new(settings.concurrency, strip))
    }

    /// Fetch details for every atomic step and merge them into `graph`.
    pub async fn enrich(
        &self,
        graph: &mut FlowGraph,
        source: Arc<dyn NodeDetailSource>,
        coords: &BuildCoordinates,
    ) -> EnrichReport {
        let targets: Vec<(NodeIdx, String)> = graph
            .iter()
            .filter(|(_, n)| n.kind == StructuralKind::AtomicStep)
            .map(|(idx, n)| (idx, n.id.clone()))
            .collect();

        let mut report = EnrichReport {
            requested: targets.len(),
            ..EnrichReport::default()
        };

        info!(
            nodes = targets.len(),
            concurrency = self.concurrency,
            "fetching node details"
        );

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let coords = Arc::new(coords.clone());
        let mut tasks = JoinSet::new();

        let mut pending: HashMap<NodeIdx, String> = targets.iter().cloned().collect();

        for (idx, id) in targets {
            let source = Arc::clone(&source);
            let coords = Arc::clone(&coords);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                // The fetch runs in its own task so a panic or cancellation
                // inside the source is still reported against this node.
                let fetch = tokio::spawn({
                    let id = id.clone();
                    async move { source.fetch_node_detail(&coords, &id).await }
                });
                let result = fetch.await.unwrap_or_else(|err| {
                    Err(StageTreeError::Other(anyhow!(
                        "detail task did not complete: {err}"
                    )))
                });
                (idx, id, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Ok((idx, _, _)) = &joined {
                pending.remove(idx);
            }
            match joined {
                Ok((idx, _, Ok(detail))) => {
                    self.merge(graph.node_mut(idx), detail, &coords);
                    report.enriched += 1;
                }
                Ok((_, id, Err(err))) => {
                    warn!(node = %id, error = %err, "node detail fetch failed; leaving node as is");
                    report.failed.push((id, err.to_string()));
                }
                Err(err) => {
                    warn!(error = %err, "node detail task did not complete");
                }
            }
        }

        // Tasks that never reported back are failures of their node too.
        let mut lost: Vec<(NodeIdx, String)> = pending.into_iter().collect();
        lost.sort_unstable();
        for (_, id) in lost {
            report
                .failed
                .push((id, "detail task did not complete".to_string()));
        }

        debug!(?report, "enrichment finished");
        report
    }

    /// Overwrite display fields of `node` from `detail`.
    pub fn merge(&self, node: &mut GraphNode, detail: NodeDetail, coords: &BuildCoordinates) {
        let description = detail.parameter_description.unwrap_or_default();
        let description = self.strip_description.replace(&description, "").into_owned();
        if !description.is_empty() {
            node.display_name = description.clone();
            node.parameter_description = Some(description);
        }

        node.duration_millis = detail.duration_millis;

        if let Some(href) = detail.log_href {
            node.log_url = Some(coords.absolute(&href));
        }
    }
}
