use stagetree::build_stage_tree;
use stagetree::graph::{FilterPolicy, LabelPolicy, RawNode};
use stagetree::render::{render_json, render_text};
use stagetree_test_utils::builders::FlowGraphBuilder;

mod common;

const DEPTH: usize = 10_000;

/// `DEPTH` stages nested inside each other around one shell step, closed
/// by a matching chain of end markers.
fn nested_stages(depth: usize) -> Vec<RawNode> {
    let mut builder = FlowGraphBuilder::new().start("s0", &[], "Start of Pipeline");
    for i in 1..=depth {
        let parent = format!("s{}", i - 1);
        builder = builder.start(&format!("s{i}"), &[parent.as_str()], &format!("Stage: {i}"));
    }

    let deepest = format!("s{depth}");
    builder = builder.atom("step", &[deepest.as_str()], "Shell Script");

    let mut tail = "step".to_string();
    for i in (0..=depth).rev() {
        let id = format!("e{i}");
        builder = builder.end(&id, &[tail.as_str()], "end");
        tail = id;
    }
    builder.build()
}

#[test]
fn test_deeply_nested_stages_build_and_render() {
    common::init_tracing();

    let tree = build_stage_tree(
        nested_stages(DEPTH),
        None,
        &LabelPolicy::default(),
        &FilterPolicy::default(),
    )
    .unwrap()
    .unwrap();

    let ids = tree.preorder_ids();
    assert_eq!(ids.len(), DEPTH + 2);
    assert_eq!(ids[DEPTH], format!("s{DEPTH}"));
    assert_eq!(ids[DEPTH + 1], "step");
    assert_eq!(tree.find("step").map(|n| n.display_name.as_str()), Some("Shell Script"));

    let text = render_text(&tree);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), DEPTH + 2);
    assert_eq!(lines[0], " [✓] Start of Pipeline");
    assert_eq!(lines[1], "- [✓] Stage: 1");
    assert_eq!(
        lines[DEPTH + 1],
        format!("{} [✓] Shell Script", "-".repeat(DEPTH + 1))
    );

    let json = render_json(&tree).unwrap();
    assert_eq!(json.matches("\"children\":[").count(), DEPTH + 2);
    assert!(json.ends_with(&"]}".repeat(DEPTH + 2)));
}

#[test]
fn test_hidden_nesting_promotes_deep_step() {
    // Only the root and atomic steps are shown, so the step is spliced
    // through every hidden stage straight under the root.
    let policy = FilterPolicy::new(["Start of Pipeline"], Vec::<String>::new());
    let tree = build_stage_tree(nested_stages(DEPTH), None, &LabelPolicy::default(), &policy)
        .unwrap()
        .unwrap();

    assert_eq!(tree.child_ids(), vec!["step"]);
    assert!(tree.children[0].children.is_empty());
}

#[test]
fn test_deep_tree_clones_equal() {
    let tree = build_stage_tree(
        nested_stages(DEPTH),
        None,
        &LabelPolicy::default(),
        &FilterPolicy::default(),
    )
    .unwrap()
    .unwrap();

    let copy = tree.clone();
    assert_eq!(copy, tree);
    drop(tree);
    assert_eq!(copy.preorder_ids().len(), DEPTH + 2);
}
