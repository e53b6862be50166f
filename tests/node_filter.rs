use stagetree::graph::{build_flow_tree, build_stage_tree, FilterPolicy, LabelPolicy, NodeFilter, StageNode};
use stagetree::types::StructuralKind;
use stagetree_test_utils::builders::{declarative_pipeline, FlowGraphBuilder};

mod common;

use common::shape;

fn filtered(nodes: Vec<stagetree::graph::RawNode>, policy: &FilterPolicy) -> StageNode {
    build_stage_tree(nodes, None, &LabelPolicy::default(), policy)
        .unwrap()
        .expect("non-empty input")
}

#[test]
fn test_declarative_pipeline_keeps_stages_branches_and_steps() {
    common::init_tracing();

    let tree = filtered(declarative_pipeline(), &FilterPolicy::default());

    assert_eq!(tree.id, "2");
    assert_eq!(tree.child_ids(), vec!["3", "8"]);

    let build = tree.find("3").unwrap();
    assert_eq!(build.display_name, "Stage: Build");
    // "Build" (node 4) is scaffolding; its step is promoted to the stage.
    assert_eq!(build.child_ids(), vec!["5"]);

    let test = tree.find("8").unwrap();
    assert_eq!(test.display_name, "Stage: Test");
    assert_eq!(test.child_ids(), vec!["11", "12"]);
    assert_eq!(tree.find("11").unwrap().child_ids(), vec!["13"]);
    // "Print Message" is blocked even though it is an atomic step.
    assert!(tree.find("12").unwrap().children.is_empty());
    assert!(tree.find("14").is_none());
}

#[test]
fn test_print_message_is_always_blocked() {
    let nodes = FlowGraphBuilder::new()
        .start("1", &[], "Start of Pipeline")
        .atom("2", &["1"], "Print Message")
        .start("3", &["2"], "Stage: Print Message")
        .atom("4", &["3"], "Shell Script")
        .build();

    let tree = filtered(nodes, &FilterPolicy::default());
    // Both the step and the allow-listed stage are dropped; the stage's step
    // is promoted to the root.
    assert_eq!(tree.child_ids(), vec!["4"]);
}

#[test]
fn test_promoted_children_keep_depth_first_order() {
    // root
    //   x (hidden)
    //     a
    //     y (hidden)
    //       b
    //       c
    //     d
    //   e
    let nodes = FlowGraphBuilder::new()
        .start("root", &[], "Start of Pipeline")
        .start("x", &["root"], "hidden x")
        .atom("a", &["x"], "step a")
        .start("y", &["a"], "hidden y")
        .atom("b", &["y"], "step b")
        .atom("c", &["b"], "step c")
        .end("y-end", &["c"], "end y")
        .atom("d", &["y-end"], "step d")
        .end("x-end", &["d"], "end x")
        .atom("e", &["x-end"], "step e")
        .build();

    let tree = filtered(nodes, &FilterPolicy::default());
    assert_eq!(tree.child_ids(), vec!["a", "b", "c", "d", "e"]);
    assert!(tree.children.iter().all(|c| c.children.is_empty()));
}

#[test]
fn test_filter_is_identity_on_allowed_trees() {
    let allow_everything = FilterPolicy::new(
        ["Start", "Stage", "Branch", "Build", "Test", "Execute"],
        Vec::<String>::new(),
    );

    let graph = build_flow_tree(declarative_pipeline(), None, &LabelPolicy::default())
        .unwrap()
        .unwrap();
    let output = NodeFilter::new(&allow_everything).apply(&graph);

    // Every node in the tree passes, so nothing moves.
    for (_, node) in graph.iter() {
        if node.kind != StructuralKind::EndMarker {
            assert!(allow_everything.allows(node), "{} should pass", node.display_name);
        }
    }
    assert_eq!(output.preorder_ids().len(), graph.tree_size());

    // The output has exactly the nesting of the built tree.
    let mut expected = Vec::new();
    let mut stack = vec![graph.root()];
    while let Some(idx) = stack.pop() {
        let node = graph.node(idx);
        expected.push((
            node.id.clone(),
            graph.tree_children_ids(&node.id).iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        ));
        stack.extend(node.tree_children.iter().rev());
    }
    assert_eq!(shape(&output), expected);
}

#[test]
fn test_disallowed_root_heads_an_empty_tree() {
    let nodes = FlowGraphBuilder::new()
        .start("1", &[], "Some other root")
        .atom("2", &["1"], "Shell Script")
        .build();

    let tree = filtered(nodes, &FilterPolicy::default());
    assert_eq!(tree.id, "1");
    assert!(tree.children.is_empty());
}

#[test]
fn test_empty_list_is_absent_not_an_error() {
    let result = build_stage_tree(Vec::new(), None, &LabelPolicy::default(), &FilterPolicy::default());
    assert!(matches!(result, Ok(None)));
}
