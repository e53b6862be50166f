// src/graph/filter.rs

//! Third pass: prune uninteresting nodes and promote their children.

use serde::Deserialize;
use tracing::debug;

use crate::graph::node::{FlowGraph, GraphNode, NodeIdx, PreorderAssembly, StageNode};
use crate::types::StructuralKind;

/// Substring policy deciding which nodes are shown.
///
/// A node is allowed iff its display name contains none of `block`, and it
/// is either an atomic step or its display name contains one of `allow`.
/// Matching is literal and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilterPolicy {
    #[serde(default = "default_allow")]
    pub allow: Vec<String>,

    #[serde(default = "default_block")]
    pub block: Vec<String>,
}

fn default_allow() -> Vec<String> {
    ["Start of Pipeline", "Branch:", "Stage : Start", "Stage:"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_block() -> Vec<String> {
    ["Determine current directory", "Print Message"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            allow: default_allow(),
            block: default_block(),
        }
    }
}

impl FilterPolicy {
    pub fn new<A, B>(allow: A, block: B) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            allow: allow.into_iter().map(Into::into).collect(),
            block: block.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_allowed(&self, display_name: &str, kind: StructuralKind) -> bool {
        if self.block.iter().any(|s| display_name.contains(s.as_str())) {
            return false;
        }
        kind == StructuralKind::AtomicStep
            || self.allow.iter().any(|s| display_name.contains(s.as_str()))
    }

    pub fn allows(&self, node: &GraphNode) -> bool {
        self.is_allowed(&node.display_name, node.kind)
    }
}

/// Walks a built tree and produces the pruned [`StageNode`] output.
#[derive(Debug, Clone, Copy)]
pub struct NodeFilter<'a> {
    policy: &'a FilterPolicy,
}

impl<'a> NodeFilter<'a> {
    pub fn new(policy: &'a FilterPolicy) -> Self {
        Self { policy }
    }

    /// Produce the display tree.
    ///
    /// The root always heads the result. Its descendants are only kept when
    /// the root itself is allowed, since otherwise nothing can receive them.
    ///
    /// A disallowed node splices its children into the nearest allowed
    /// ancestor, keeping depth-first order. The walk uses an explicit stack
    /// of `(node, attachment target)`, so nesting depth is not bounded by
    /// the call stack.
    pub fn apply(&self, graph: &FlowGraph) -> StageNode {
        let root = graph.node(graph.root());
        let mut assembly = PreorderAssembly::new(StageNode::from_graph_node(root));

        let mut stack: Vec<(NodeIdx, usize)> = Vec::new();
        if self.policy.allows(root) {
            stack.extend(root.tree_children.iter().rev().map(|&c| (c, 0)));
        }

        while let Some((idx, target)) = stack.pop() {
            let node = graph.node(idx);
            let target = if self.policy.allows(node) {
                assembly.push(StageNode::from_graph_node(node), target)
            } else {
                target
            };
            stack.extend(node.tree_children.iter().rev().map(|&c| (c, target)));
        }

        debug!(kept = assembly.len(), "filtered stage tree");
        assembly
            .finish()
            .unwrap_or_else(|| StageNode::from_graph_node(root))
    }
}
