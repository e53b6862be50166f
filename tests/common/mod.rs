#![allow(dead_code)]

use std::path::PathBuf;

use stagetree::graph::StageNode;

pub use stagetree_test_utils::init_tracing;

/// Directory holding the saved engine documents used by the tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// `(id, child ids)` for every node of the tree, pre-order.
pub fn shape(node: &StageNode) -> Vec<(String, Vec<String>)> {
    let mut out = vec![(
        node.id.clone(),
        node.children.iter().map(|c| c.id.clone()).collect(),
    )];
    for child in &node.children {
        out.extend(shape(child));
    }
    out
}
