use stagetree::errors::StageTreeError;
use stagetree::graph::{build_flow_tree, index_nodes, LabelPolicy};
use stagetree::types::BuildCoordinates;
use stagetree_test_utils::builders::{declarative_pipeline, FlowGraphBuilder};

mod common;

#[test]
fn test_root_gets_forward_edges_in_list_order() {
    common::init_tracing();

    let nodes = FlowGraphBuilder::new()
        .other("1", &[], "root")
        .other("2", &["1"], "a")
        .other("3", &["1"], "b")
        .build();

    let graph = index_nodes(nodes, None, &LabelPolicy::default()).unwrap();

    assert_eq!(graph.node(graph.root()).id, "1");
    assert_eq!(graph.forward_ids("1"), vec!["2", "3"]);
}

#[test]
fn test_stage_placeholders_are_relabelled() {
    let graph = index_nodes(declarative_pipeline(), None, &LabelPolicy::default()).unwrap();

    assert_eq!(graph.get("3").unwrap().display_name, "Stage: Build");
    assert_eq!(graph.get("8").unwrap().display_name, "Stage: Test");
    // Nodes that are not placeholders keep their names.
    assert_eq!(graph.get("4").unwrap().display_name, "Build");
}

#[test]
fn test_custom_label_policy() {
    let nodes = FlowGraphBuilder::new()
        .start("1", &[], "Start of Pipeline")
        .start("2", &["1"], "<stage>")
        .start("3", &["2"], "Deploy")
        .build();
    let labels = LabelPolicy {
        stage_start_placeholder: "<stage>".to_string(),
        stage_label_prefix: "Phase ".to_string(),
    };

    let graph = index_nodes(nodes, None, &labels).unwrap();
    assert_eq!(graph.get("2").unwrap().display_name, "Phase Deploy");
}

#[test]
fn test_log_urls_only_on_atomic_steps() {
    let coords = BuildCoordinates::new("https://ci.example.com", "demo", 12);
    let graph = index_nodes(declarative_pipeline(), Some(&coords), &LabelPolicy::default()).unwrap();

    for (_, node) in graph.iter() {
        let is_step = node.kind == stagetree::types::StructuralKind::AtomicStep;
        assert_eq!(node.log_url.is_some(), is_step, "node {}", node.id);
        assert_eq!(node.log_url_full.is_some(), is_step, "node {}", node.id);
    }
    assert_eq!(
        graph.get("13").unwrap().log_url.as_deref(),
        Some("https://ci.example.com/job/demo/12/execution/node/13/log/")
    );
}

#[test]
fn test_unknown_parent_is_reported_with_ids() {
    let nodes = FlowGraphBuilder::new()
        .start("1", &[], "Start of Pipeline")
        .atom("2", &["1"], "Shell Script")
        .atom("3", &["42"], "Shell Script")
        .build();

    match index_nodes(nodes, None, &LabelPolicy::default()) {
        Err(StageTreeError::DanglingParent { node_id, parent_id }) => {
            assert_eq!(node_id, "3");
            assert_eq!(parent_id, "42");
        }
        Err(e) => panic!("Expected DanglingParent, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_duplicate_id_later_record_wins_lookup() {
    common::init_tracing();

    let nodes = FlowGraphBuilder::new()
        .start("1", &[], "Start of Pipeline")
        .atom("2", &["1"], "first")
        .atom("2", &["1"], "second")
        .atom("3", &["2"], "after")
        .build();

    let graph = index_nodes(nodes, None, &LabelPolicy::default()).unwrap();

    // Both records keep their arena slot and are linked from their parent.
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.forward_ids("1"), vec!["2", "2"]);

    // Lookups by id, and children naming the id, resolve to the later record.
    assert_eq!(graph.get("2").unwrap().display_name, "second");
    assert_eq!(graph.forward_ids("2"), vec!["3"]);
    assert!(graph.node(1).forward_edges.is_empty());
    assert_eq!(graph.node(2).forward_edges, vec![3]);
}

#[test]
fn test_duplicate_id_both_records_are_nested() {
    let nodes = FlowGraphBuilder::new()
        .start("1", &[], "Start of Pipeline")
        .atom("2", &["1"], "first")
        .atom("2", &["1"], "second")
        .atom("3", &["2"], "after")
        .build();

    let graph = build_flow_tree(nodes, None, &LabelPolicy::default())
        .unwrap()
        .unwrap();

    let root = graph.node(graph.root());
    let names: Vec<&str> = root
        .tree_children
        .iter()
        .map(|&c| graph.node(c).display_name.as_str())
        .collect();
    assert_eq!(names, vec!["first", "second", "after"]);
    assert_eq!(graph.tree_children_ids("1"), vec!["2", "2", "3"]);
    assert_eq!(graph.node(3).tree_parent, Some(graph.root()));
}
