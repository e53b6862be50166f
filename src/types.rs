// src/types.rs

//! Small shared types: structural node classification and build coordinates.

use serde::{Deserialize, Serialize};

/// Engine class tag of the graph action that carries the flow nodes.
pub const FLOW_GRAPH_ACTION_CLASS: &str = "org.jenkinsci.plugins.workflow.job.views.FlowGraphAction";

const START_MARKER_CLASSES: &[&str] = &[
    "org.jenkinsci.plugins.workflow.cps.nodes.StepStartNode",
    "org.jenkinsci.plugins.workflow.graph.FlowStartNode",
];

const END_MARKER_CLASSES: &[&str] = &[
    "org.jenkinsci.plugins.workflow.graph.FlowEndNode",
    "org.jenkinsci.plugins.workflow.cps.nodes.StepEndNode",
];

const ATOMIC_STEP_CLASS: &str = "org.jenkinsci.plugins.workflow.cps.nodes.StepAtomNode";

/// Structural role of a flow node, derived from the engine's class tag.
///
/// - `StartMarker`: opens a nested scope (stage, parallel block, branch, the
///   pipeline itself).
/// - `EndMarker`: closes the innermost open scope.
/// - `AtomicStep`: a leaf step that actually did work (shell script, archive, ...).
/// - `Other`: anything the tree builder treats as plain content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralKind {
    StartMarker,
    EndMarker,
    AtomicStep,
    Other,
}

impl StructuralKind {
    /// Map an engine class tag (`_class`) onto a structural kind.
    pub fn from_class(class: &str) -> Self {
        if START_MARKER_CLASSES.contains(&class) {
            StructuralKind::StartMarker
        } else if END_MARKER_CLASSES.contains(&class) {
            StructuralKind::EndMarker
        } else if class == ATOMIC_STEP_CLASS {
            StructuralKind::AtomicStep
        } else {
            StructuralKind::Other
        }
    }
}

/// Identifies a single build on the engine: where it lives and which run it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCoordinates {
    pub base_url: String,
    pub job_name: String,
    pub build_number: u64,
}

impl BuildCoordinates {
    pub fn new(base_url: impl Into<String>, job_name: impl Into<String>, build_number: u64) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            job_name: job_name.into(),
            build_number,
        }
    }

    fn build_url(&self) -> String {
        format!("{}/job/{}/{}", self.base_url, self.job_name, self.build_number)
    }

    /// URL of the build document listing every flow node of the run.
    pub fn stages_url(&self) -> String {
        format!(
            "{}/api/json?tree=actions[nodes[iconColor,running,displayName,id,parents]]",
            self.build_url()
        )
    }

    /// URL of the per-node detail document.
    pub fn node_detail_url(&self, node_id: &str) -> String {
        format!("{}/execution/node/{}/wfapi/", self.build_url(), node_id)
    }

    pub fn log_url(&self, node_id: &str) -> String {
        format!("{}/execution/node/{}/log/", self.build_url(), node_id)
    }

    pub fn log_url_full(&self, node_id: &str) -> String {
        format!("{}?consoleFull", self.log_url(node_id))
    }

    /// Resolve a server-relative link (e.g. `/job/x/1/execution/node/5/wfapi/log`).
    pub fn absolute(&self, href: &str) -> String {
        format!("{}{}", self.base_url, href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_engine_classes() {
        assert_eq!(
            StructuralKind::from_class("org.jenkinsci.plugins.workflow.graph.FlowStartNode"),
            StructuralKind::StartMarker
        );
        assert_eq!(
            StructuralKind::from_class("org.jenkinsci.plugins.workflow.cps.nodes.StepEndNode"),
            StructuralKind::EndMarker
        );
        assert_eq!(
            StructuralKind::from_class("org.jenkinsci.plugins.workflow.cps.nodes.StepAtomNode"),
            StructuralKind::AtomicStep
        );
        assert_eq!(StructuralKind::from_class("something.Else"), StructuralKind::Other);
    }

    #[test]
    fn builds_log_urls_without_double_slash() {
        let coords = BuildCoordinates::new("http://ci.local/", "demo", 7);
        assert_eq!(coords.log_url("5"), "http://ci.local/job/demo/7/execution/node/5/log/");
        assert_eq!(
            coords.log_url_full("5"),
            "http://ci.local/job/demo/7/execution/node/5/log/?consoleFull"
        );
        assert_eq!(
            coords.node_detail_url("5"),
            "http://ci.local/job/demo/7/execution/node/5/wfapi/"
        );
    }
}
