#![allow(dead_code)]

use stagetree::graph::RawNode;
use stagetree::types::StructuralKind;

/// Builder for a flat flow-node list, in the order the engine reports it.
///
/// Every helper takes the node id, its parent ids and a display name:
///
/// ```ignore
/// let nodes = FlowGraphBuilder::new()
///     .start("1", &[], "Start of Pipeline")
///     .atom("2", &["1"], "Shell Script")
///     .end("3", &["2"], "End of Pipeline")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct FlowGraphBuilder {
    nodes: Vec<RawNode>,
}

impl FlowGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, id: &str, parents: &[&str], name: &str, kind: StructuralKind) -> Self {
        self.nodes.push(RawNode {
            id: id.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            display_name: name.to_string(),
            kind,
            running: false,
            icon_color: "blue".to_string(),
        });
        self
    }

    pub fn start(self, id: &str, parents: &[&str], name: &str) -> Self {
        self.node(id, parents, name, StructuralKind::StartMarker)
    }

    pub fn end(self, id: &str, parents: &[&str], name: &str) -> Self {
        self.node(id, parents, name, StructuralKind::EndMarker)
    }

    pub fn atom(self, id: &str, parents: &[&str], name: &str) -> Self {
        self.node(id, parents, name, StructuralKind::AtomicStep)
    }

    pub fn other(self, id: &str, parents: &[&str], name: &str) -> Self {
        self.node(id, parents, name, StructuralKind::Other)
    }

    /// Mark the most recently added node as running.
    pub fn running(mut self) -> Self {
        if let Some(last) = self.nodes.last_mut() {
            last.running = true;
            last.icon_color = "blue_anime".to_string();
        }
        self
    }

    pub fn build(self) -> Vec<RawNode> {
        self.nodes
    }
}

/// A two-stage declarative pipeline, the second stage running two branches
/// in parallel. Node ids follow the engine's numbering.
///
/// ```text
/// 2  Start of Pipeline
/// 3  Stage : Start        (relabelled "Stage: Build")
/// 4    Build
/// 5      Shell Script
/// 6    end / 7 end
/// 8  Stage : Start        (relabelled "Stage: Test")
/// 9    Test
/// 10     Execute in parallel
/// 11       Branch: unit   -> 13 Shell Script -> 15 end
/// 12       Branch: lint   -> 14 Print Message -> 16 end
/// 17     end (join) / 18 end / 19 end
/// 20 End of Pipeline
/// ```
pub fn declarative_pipeline() -> Vec<RawNode> {
    FlowGraphBuilder::new()
        .start("2", &[], "Start of Pipeline")
        .start("3", &["2"], "Stage : Start")
        .start("4", &["3"], "Build")
        .atom("5", &["4"], "Shell Script")
        .end("6", &["5"], "Stage : Body : End")
        .end("7", &["6"], "Stage : End")
        .start("8", &["7"], "Stage : Start")
        .start("9", &["8"], "Test")
        .start("10", &["9"], "Execute in parallel")
        .start("11", &["10"], "Branch: unit")
        .start("12", &["10"], "Branch: lint")
        .atom("13", &["11"], "Shell Script")
        .atom("14", &["12"], "Print Message")
        .end("15", &["13"], "Parallel : Body : End")
        .end("16", &["14"], "Parallel : Body : End")
        .end("17", &["15", "16"], "Execute in parallel : End")
        .end("18", &["17"], "Stage : Body : End")
        .end("19", &["18"], "Stage : End")
        .end("20", &["19"], "End of Pipeline")
        .build()
}
