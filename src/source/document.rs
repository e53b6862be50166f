// src/source/document.rs

//! Serde model of the engine's JSON documents.
//!
//! Only the fields needed to build the stage tree are modelled; everything
//! else in the documents is ignored.

use serde::Deserialize;
use tracing::debug;

use crate::errors::Result;
use crate::graph::RawNode;
use crate::types::{StructuralKind, FLOW_GRAPH_ACTION_CLASS};

/// Build document: `{ "actions": [ ... ] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildDocument {
    #[serde(default)]
    pub actions: Vec<ActionDocument>,
}

/// One entry of `actions`. Most actions are unrelated to the flow graph and
/// may even be empty objects.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionDocument {
    #[serde(rename = "_class", default)]
    pub class: Option<String>,

    #[serde(default)]
    pub nodes: Option<Vec<NodeDocument>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDocument {
    #[serde(rename = "_class", default)]
    pub class: String,
    pub id: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub icon_color: String,
}

impl From<NodeDocument> for RawNode {
    fn from(doc: NodeDocument) -> Self {
        RawNode {
            kind: StructuralKind::from_class(&doc.class),
            id: doc.id,
            parents: doc.parents,
            display_name: doc.display_name,
            running: doc.running,
            icon_color: doc.icon_color,
        }
    }
}

impl BuildDocument {
    /// Nodes of the first flow-graph action, or `None` if the engine has not
    /// published one yet.
    pub fn into_raw_nodes(self) -> Option<Vec<RawNode>> {
        let nodes = self
            .actions
            .into_iter()
            .find(|a| a.class.as_deref() == Some(FLOW_GRAPH_ACTION_CLASS))?
            .nodes?;
        Some(nodes.into_iter().map(RawNode::from).collect())
    }
}

/// Parse a build document and extract its flow nodes.
pub fn parse_build_document(json: &str) -> Result<Option<Vec<RawNode>>> {
    let doc: BuildDocument = serde_json::from_str(json)?;
    let nodes = doc.into_raw_nodes();
    debug!(
        nodes = nodes.as_ref().map(Vec::len),
        "parsed build document"
    );
    Ok(nodes)
}

/// Per-node detail document (`.../execution/node/<id>/wfapi/`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetailDocument {
    pub id: String,
    #[serde(default)]
    pub parameter_description: Option<String>,
    #[serde(default)]
    pub duration_millis: Option<u64>,
    #[serde(rename = "_links", default)]
    pub links: Option<LinksDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinksDocument {
    #[serde(default)]
    pub log: Option<LinkDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkDocument {
    pub href: String,
}

/// Supplemental per-node data used by the enricher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDetail {
    pub id: String,
    pub parameter_description: Option<String>,
    pub duration_millis: Option<u64>,
    /// Server-relative log link.
    pub log_href: Option<String>,
}

impl From<NodeDetailDocument> for NodeDetail {
    fn from(doc: NodeDetailDocument) -> Self {
        NodeDetail {
            id: doc.id,
            parameter_description: doc.parameter_description,
            duration_millis: doc.duration_millis,
            log_href: doc.links.and_then(|l| l.log).map(|l| l.href),
        }
    }
}

pub fn parse_node_detail(json: &str) -> Result<NodeDetail> {
    let doc: NodeDetailDocument = serde_json::from_str(json)?;
    Ok(doc.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_flow_graph_action_and_maps_classes() {
        let json = r#"{
            "actions": [
                {},
                {"_class": "hudson.model.CauseAction"},
                {"_class": "org.jenkinsci.plugins.workflow.job.views.FlowGraphAction",
                 "nodes": [
                    {"_class": "org.jenkinsci.plugins.workflow.graph.FlowStartNode",
                     "displayName": "Start of Pipeline", "iconColor": "blue",
                     "id": "2", "parents": [], "running": false},
                    {"_class": "org.jenkinsci.plugins.workflow.cps.nodes.StepAtomNode",
                     "displayName": "Shell Script", "iconColor": "blue_anime",
                     "id": "3", "parents": ["2"], "running": true}
                 ]}
            ]
        }"#;

        let nodes = parse_build_document(json).unwrap().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind, StructuralKind::StartMarker);
        assert!(nodes[0].parents.is_empty());
        assert_eq!(nodes[1].kind, StructuralKind::AtomicStep);
        assert_eq!(nodes[1].parents, vec!["2".to_string()]);
        assert!(nodes[1].running);
        assert_eq!(nodes[1].icon_color, "blue_anime");
    }

    #[test]
    fn missing_flow_graph_action_is_absent() {
        let json = r#"{"actions": [{"_class": "hudson.model.CauseAction"}]}"#;
        assert!(parse_build_document(json).unwrap().is_none());
    }

    #[test]
    fn parses_node_detail_links() {
        let json = r#"{
            "id": "5",
            "name": "Shell Script",
            "parameterDescription": "make test",
            "durationMillis": 4200,
            "_links": {"self": {"href": "/x"}, "log": {"href": "/job/demo/1/execution/node/5/wfapi/log"}}
        }"#;
        let detail = parse_node_detail(json).unwrap();
        assert_eq!(detail.id, "5");
        assert_eq!(detail.duration_millis, Some(4200));
        assert_eq!(
            detail.log_href.as_deref(),
            Some("/job/demo/1/execution/node/5/wfapi/log")
        );
    }
}
