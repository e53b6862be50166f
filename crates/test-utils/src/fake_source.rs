use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stagetree::errors::StageTreeError;
use stagetree::graph::RawNode;
use stagetree::source::{GraphSource, NodeDetail, NodeDetailSource, SourceFuture};
use stagetree::types::BuildCoordinates;

/// A graph source returning a fixed node list (or nothing).
#[derive(Debug, Clone, Default)]
pub struct FakeGraphSource {
    nodes: Option<Vec<RawNode>>,
}

impl FakeGraphSource {
    pub fn new(nodes: Vec<RawNode>) -> Self {
        Self { nodes: Some(nodes) }
    }

    /// A source for a build whose graph has not been published yet.
    pub fn absent() -> Self {
        Self { nodes: None }
    }
}

impl GraphSource for FakeGraphSource {
    fn fetch_graph<'a>(&'a self, _coords: &'a BuildCoordinates) -> SourceFuture<'a, Option<Vec<RawNode>>> {
        let nodes = self.nodes.clone();
        Box::pin(async move { Ok(nodes) })
    }
}

/// A detail source that:
/// - answers from a fixed map, failing for unknown ids
/// - panics for ids registered with [`FakeDetailSource::with_panic`]
/// - records which ids were requested
/// - tracks the peak number of concurrent fetches
#[derive(Debug, Default)]
pub struct FakeDetailSource {
    details: HashMap<String, NodeDetail>,
    panics_on: HashSet<String>,
    delay: Duration,
    requested: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeDetailSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detail(mut self, detail: NodeDetail) -> Self {
        self.details.insert(detail.id.clone(), detail);
        self
    }

    /// Panic instead of answering for `id`, like a crashing client would.
    pub fn with_panic(mut self, id: &str) -> Self {
        self.panics_on.insert(id.to_string());
        self
    }

    /// Make every fetch take at least `delay`, so concurrent fetches overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requested(&self) -> Vec<String> {
        let mut ids = self.requested.lock().unwrap().clone();
        ids.sort();
        ids
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl NodeDetailSource for FakeDetailSource {
    fn fetch_node_detail<'a>(
        &'a self,
        _coords: &'a BuildCoordinates,
        node_id: &'a str,
    ) -> SourceFuture<'a, NodeDetail> {
        Box::pin(async move {
            self.requested.lock().unwrap().push(node_id.to_string());

            if self.panics_on.contains(node_id) {
                panic!("detail client crashed on node {node_id}");
            }

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.details.get(node_id).cloned().ok_or_else(|| {
                StageTreeError::Other(anyhow::anyhow!("no detail for node {node_id}"))
            })
        })
    }
}

/// Convenience constructor for a detail record.
pub fn detail(id: &str, description: &str, duration_millis: u64) -> NodeDetail {
    NodeDetail {
        id: id.to_string(),
        parameter_description: Some(description.to_string()),
        duration_millis: Some(duration_millis),
        log_href: Some(format!("/job/demo/1/execution/node/{id}/wfapi/log")),
    }
}
