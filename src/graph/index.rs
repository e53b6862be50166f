// src/graph/index.rs

//! First pass: build the id lookup, find the root, invert parent links.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{Result, StageTreeError};
use crate::graph::node::{FlowGraph, GraphNode, NodeIdx, RawNode};
use crate::types::{BuildCoordinates, StructuralKind};

/// How generic stage-start markers are relabelled.
///
/// The engine names the outer start node of every stage with the same
/// placeholder; the stage's real name only shows up on its first child.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelPolicy {
    /// Substring identifying a placeholder start label.
    #[serde(default = "default_stage_start_placeholder")]
    pub stage_start_placeholder: String,

    /// Prepended to the child's name to form the new label.
    #[serde(default = "default_stage_label_prefix")]
    pub stage_label_prefix: String,
}

fn default_stage_start_placeholder() -> String {
    "Stage : Start".to_string()
}

fn default_stage_label_prefix() -> String {
    "Stage: ".to_string()
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            stage_start_placeholder: default_stage_start_placeholder(),
            stage_label_prefix: default_stage_label_prefix(),
        }
    }
}

/// Index a flat node list into a [`FlowGraph`].
///
/// - Every node gets an arena slot; the id map points at the *last* record
///   carrying a given id.
/// - The root is the node with no parents. If several qualify, the last one
///   in list order wins and the others are reported at `warn`.
/// - `forward_edges` is filled as the exact inverse of `parents`.
/// - Placeholder stage labels are rewritten from their first child's name.
/// - Atomic steps get log URLs when `coords` is given.
pub fn index_nodes(
    raw: Vec<RawNode>,
    coords: Option<&BuildCoordinates>,
    labels: &LabelPolicy,
) -> Result<FlowGraph> {
    let mut nodes: Vec<GraphNode> = Vec::with_capacity(raw.len());
    let mut by_id: HashMap<String, NodeIdx> = HashMap::with_capacity(raw.len());
    let mut root: Option<NodeIdx> = None;

    for (idx, node) in raw.into_iter().enumerate() {
        if by_id.insert(node.id.clone(), idx).is_some() {
            warn!(id = %node.id, "duplicate node id; later record wins");
        }

        if node.parents.is_empty() {
            if let Some(previous) = root {
                warn!(
                    previous = %nodes[previous].id,
                    replacement = %node.id,
                    "multiple parentless nodes; using the later one as root"
                );
            }
            root = Some(idx);
        }

        nodes.push(GraphNode::from(node));
    }

    let root = root.ok_or(StageTreeError::MissingRoot)?;

    for idx in 0..nodes.len() {
        for p in 0..nodes[idx].parents.len() {
            let parent_id = &nodes[idx].parents[p];
            let parent = *by_id.get(parent_id).ok_or_else(|| {
                StageTreeError::DanglingParent {
                    node_id: nodes[idx].id.clone(),
                    parent_id: parent_id.clone(),
                }
            })?;

            nodes[parent].forward_edges.push(idx);

            if nodes[parent]
                .display_name
                .contains(&labels.stage_start_placeholder)
            {
                let label = format!("{}{}", labels.stage_label_prefix, nodes[idx].display_name);
                debug!(id = %nodes[parent].id, %label, "relabelling stage start");
                nodes[parent].display_name = label;
            }
        }

        if nodes[idx].kind == StructuralKind::AtomicStep {
            if let Some(coords) = coords {
                let id = nodes[idx].id.clone();
                nodes[idx].log_url = Some(coords.log_url(&id));
                nodes[idx].log_url_full = Some(coords.log_url_full(&id));
            }
        }
    }

    debug!(nodes = nodes.len(), root = %nodes[root].id, "indexed flow graph");

    Ok(FlowGraph { nodes, by_id, root })
}
