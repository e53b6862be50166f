// src/graph/node.rs

//! Node representations used by the three tree-building passes.
//!
//! - [`RawNode`] is one element of the engine's flat node list.
//! - [`GraphNode`] is the working record kept in a [`FlowGraph`] arena; all
//!   cross-references (forward edges, tree parent/children) are indices into
//!   that arena.
//! - [`StageNode`] is the final, owned output tree. It carries only the
//!   displayable fields, so transient bookkeeping cannot leak out.

use std::collections::HashMap;

use crate::types::StructuralKind;

/// Stable index of a node inside a [`FlowGraph`].
pub type NodeIdx = usize;

/// One flow node as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    pub id: String,
    /// Parent ids in engine order; empty only for the root.
    pub parents: Vec<String>,
    pub display_name: String,
    pub kind: StructuralKind,
    pub running: bool,
    pub icon_color: String,
}

/// Working node: the raw fields plus links populated by the passes.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    pub parents: Vec<String>,
    pub display_name: String,
    pub kind: StructuralKind,
    pub running: bool,
    pub icon_color: String,

    /// Inverse of `parents`, in input-list order of the children.
    pub forward_edges: Vec<NodeIdx>,
    /// Nesting parent, set by the tree builder. Non-owning.
    pub tree_parent: Option<NodeIdx>,
    /// Nesting children in attach order.
    pub tree_children: Vec<NodeIdx>,

    /// Only set for atomic steps when build coordinates are known.
    pub log_url: Option<String>,
    pub log_url_full: Option<String>,

    // Filled in by the enricher, if it runs.
    pub duration_millis: Option<u64>,
    pub parameter_description: Option<String>,
}

impl From<RawNode> for GraphNode {
    fn from(raw: RawNode) -> Self {
        Self {
            id: raw.id,
            parents: raw.parents,
            display_name: raw.display_name,
            kind: raw.kind,
            running: raw.running,
            icon_color: raw.icon_color,
            forward_edges: Vec::new(),
            tree_parent: None,
            tree_children: Vec::new(),
            log_url: None,
            log_url_full: None,
            duration_millis: None,
            parameter_description: None,
        }
    }
}

/// Arena holding every node of one build plus the id lookup and the root.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    pub(crate) nodes: Vec<GraphNode>,
    pub(crate) by_id: HashMap<String, NodeIdx>,
    pub(crate) root: NodeIdx,
}

impl FlowGraph {
    pub fn root(&self) -> NodeIdx {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: NodeIdx) -> &GraphNode {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIdx) -> &mut GraphNode {
        &mut self.nodes[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIdx> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    /// All nodes in input order, paired with their arena index.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &GraphNode)> {
        self.nodes.iter().enumerate()
    }

    /// Ids of the forward edges of `id`, in order. Empty for unknown ids.
    pub fn forward_ids(&self, id: &str) -> Vec<&str> {
        self.get(id)
            .map(|n| {
                n.forward_edges
                    .iter()
                    .map(|&c| self.nodes[c].id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ids of the nesting children of `id`, in order. Empty for unknown ids.
    pub fn tree_children_ids(&self, id: &str) -> Vec<&str> {
        self.get(id)
            .map(|n| {
                n.tree_children
                    .iter()
                    .map(|&c| self.nodes[c].id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of nodes reachable from the root through `tree_children`
    /// (the root included).
    pub fn tree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[idx].tree_children.iter().copied());
        }
        count
    }
}

/// Final display node. Owns its children.
///
/// Trees nest as deep as the pipeline's scopes do, so cloning, comparing,
/// searching and dropping all walk the tree with an explicit stack.
#[derive(Debug, Eq)]
pub struct StageNode {
    pub id: String,
    pub display_name: String,
    pub kind: StructuralKind,
    pub running: bool,
    pub icon_color: String,
    pub log_url: Option<String>,
    pub log_url_full: Option<String>,
    pub duration_millis: Option<u64>,
    pub parameter_description: Option<String>,
    pub children: Vec<StageNode>,
}

impl StageNode {
    /// Copy the displayable fields of a working node; children start empty.
    pub fn from_graph_node(node: &GraphNode) -> Self {
        Self {
            id: node.id.clone(),
            display_name: node.display_name.clone(),
            kind: node.kind,
            running: node.running,
            icon_color: node.icon_color.clone(),
            log_url: node.log_url.clone(),
            log_url_full: node.log_url_full.clone(),
            duration_millis: node.duration_millis,
            parameter_description: node.parameter_description.clone(),
            children: Vec::new(),
        }
    }

    pub fn child_ids(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.id.as_str()).collect()
    }

    /// Ids in depth-first pre-order, this node first.
    pub fn preorder_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node.id.as_str());
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Find a node anywhere below (or at) this one, in pre-order.
    pub fn find(&self, id: &str) -> Option<&StageNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// This node without its children.
    fn detached(&self) -> Self {
        Self {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            kind: self.kind,
            running: self.running,
            icon_color: self.icon_color.clone(),
            log_url: self.log_url.clone(),
            log_url_full: self.log_url_full.clone(),
            duration_millis: self.duration_millis,
            parameter_description: self.parameter_description.clone(),
            children: Vec::new(),
        }
    }

    fn same_fields(&self, other: &Self) -> bool {
        self.id == other.id
            && self.display_name == other.display_name
            && self.kind == other.kind
            && self.running == other.running
            && self.icon_color == other.icon_color
            && self.log_url == other.log_url
            && self.log_url_full == other.log_url_full
            && self.duration_millis == other.duration_millis
            && self.parameter_description == other.parameter_description
    }
}

/// Builds a tree out of childless nodes listed in depth-first pre-order.
///
/// `nodes[0]` is the head; every other entry is paired with the position of
/// its parent, which always precedes it. Sibling order follows list order.
#[derive(Debug)]
pub(crate) struct PreorderAssembly {
    slots: Vec<Option<StageNode>>,
    parents: Vec<usize>,
}

impl PreorderAssembly {
    pub(crate) fn new(head: StageNode) -> Self {
        Self {
            slots: vec![Some(head)],
            parents: vec![0],
        }
    }

    /// Append `node` under the entry at `parent`; returns the new entry's position.
    pub(crate) fn push(&mut self, node: StageNode, parent: usize) -> usize {
        self.slots.push(Some(node));
        self.parents.push(parent);
        self.slots.len() - 1
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn finish(mut self) -> Option<StageNode> {
        // Every descendant sits after its ancestor, so walking backwards
        // completes each subtree before it is moved into its parent. Children
        // arrive last-first and are flipped once their subtree is complete.
        for slot in (1..self.slots.len()).rev() {
            let Some(mut node) = self.slots[slot].take() else {
                continue;
            };
            node.children.reverse();
            if let Some(parent) = self.slots[self.parents[slot]].as_mut() {
                parent.children.push(node);
            }
        }
        let mut head = self.slots.first_mut()?.take()?;
        head.children.reverse();
        Some(head)
    }
}

impl Clone for StageNode {
    fn clone(&self) -> Self {
        let mut assembly = PreorderAssembly::new(self.detached());
        let mut stack: Vec<(&StageNode, usize)> =
            self.children.iter().rev().map(|c| (c, 0)).collect();
        while let Some((node, parent)) = stack.pop() {
            let slot = assembly.push(node.detached(), parent);
            stack.extend(node.children.iter().rev().map(|c| (c, slot)));
        }
        assembly.finish().unwrap_or_else(|| self.detached())
    }
}

impl PartialEq for StageNode {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if !a.same_fields(b) || a.children.len() != b.children.len() {
                return false;
            }
            stack.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Drop for StageNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
