// src/graph/mod.rs

//! Flow graph reconstruction.
//!
//! - [`index`] builds the id lookup, finds the root and inverts parent links.
//! - [`builder`] nests the forward-linked graph using start/end markers.
//! - [`filter`] prunes nodes outside the display policy and promotes their
//!   children.
//! - [`node`] holds the raw, working and output node types.
//!
//! The passes are synchronous and do no IO. Enrichment, if any, runs on the
//! [`FlowGraph`] between [`build_flow_tree`] and [`NodeFilter::apply`].

pub mod builder;
pub mod filter;
pub mod index;
pub mod node;

pub use builder::build_tree;
pub use filter::{FilterPolicy, NodeFilter};
pub use index::{index_nodes, LabelPolicy};
pub use node::{FlowGraph, GraphNode, NodeIdx, RawNode, StageNode};

use crate::errors::Result;
use crate::types::BuildCoordinates;

/// Index the flat list and nest it. Returns `None` for an empty list.
pub fn build_flow_tree(
    raw: Vec<RawNode>,
    coords: Option<&BuildCoordinates>,
    labels: &LabelPolicy,
) -> Result<Option<FlowGraph>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let mut graph = index_nodes(raw, coords, labels)?;
    build_tree(&mut graph)?;
    Ok(Some(graph))
}

/// Run all three passes without enrichment.
///
/// `Ok(None)` means there was nothing to build (no nodes yet), which callers
/// should treat as "not ready" rather than as a failure.
pub fn build_stage_tree(
    raw: Vec<RawNode>,
    coords: Option<&BuildCoordinates>,
    labels: &LabelPolicy,
    policy: &FilterPolicy,
) -> Result<Option<StageNode>> {
    let Some(graph) = build_flow_tree(raw, coords, labels)? else {
        return Ok(None);
    };
    Ok(Some(NodeFilter::new(policy).apply(&graph)))
}
