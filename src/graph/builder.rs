// src/graph/builder.rs

//! Second pass: turn the forward-linked flow graph into a nested tree.
//!
//! The flow graph is a DAG in which scopes are delimited by start/end marker
//! nodes. Walking it depth-first from the root while carrying the "current
//! nesting context" recovers the scope structure:
//!
//! - an end marker closes the current scope (context moves to its parent),
//! - any other node is attached under the current context,
//! - a start marker then becomes the context for everything after it.
//!
//! Parallel branches all start from the same context snapshot, so concurrent
//! work ends up as ordered siblings rather than separate subtrees.

use std::collections::HashSet;

use tracing::debug;

use crate::errors::{Result, StageTreeError};
use crate::graph::node::{FlowGraph, NodeIdx};
use crate::types::StructuralKind;

/// One pending visit: the node plus the nesting context it is seen in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Visit {
    node: NodeIdx,
    context: Option<NodeIdx>,
}

/// Populate `tree_parent` / `tree_children` for every node reachable from
/// the root.
///
/// A node reached again through another forward edge is attached at most
/// once (to the first context it was seen in). Reaching it again with the
/// same context would rebuild exactly the same subtree, so such visits are
/// skipped entirely.
pub fn build_tree(graph: &mut FlowGraph) -> Result<()> {
    let mut seen: HashSet<Visit> = HashSet::new();
    let mut stack = vec![Visit {
        node: graph.root,
        context: None,
    }];

    while let Some(visit) = stack.pop() {
        if !seen.insert(visit) {
            continue;
        }

        let Visit { node, mut context } = visit;

        if graph.nodes[node].kind == StructuralKind::EndMarker {
            let open = context.ok_or_else(|| StageTreeError::UnbalancedStructuralMarker {
                node_id: graph.nodes[node].id.clone(),
            })?;
            context = graph.nodes[open].tree_parent;
        } else if let Some(parent) = context {
            attach(graph, parent, node);
        }

        if graph.nodes[node].kind == StructuralKind::StartMarker {
            context = Some(node);
        }

        // Reverse so the first forward edge is visited first.
        for &next in graph.nodes[node].forward_edges.iter().rev() {
            stack.push(Visit { node: next, context });
        }
    }

    debug!(
        nodes = graph.len(),
        in_tree = graph.tree_size(),
        "built nested stage tree"
    );

    Ok(())
}

fn attach(graph: &mut FlowGraph, parent: NodeIdx, child: NodeIdx) {
    if child == graph.root || graph.nodes[child].tree_parent.is_some() {
        return;
    }
    graph.nodes[parent].tree_children.push(child);
    graph.nodes[child].tree_parent = Some(parent);
}
