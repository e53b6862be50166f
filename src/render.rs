// src/render.rs

//! Human-readable and JSON output of a finished stage tree.
//!
//! Both renderers walk the tree with an explicit stack; pipelines can nest
//! deeper than the call stack allows.

use std::fmt::Write;

use serde::Serialize;

use crate::errors::Result;
use crate::graph::StageNode;
use crate::types::StructuralKind;

/// Render one line per node, indented with one `-` per depth level. The root
/// sits at depth 0, so its line starts with the separating space.
///
/// Durations are unrounded minutes (`durationMillis / 60000`), so 30s
/// prints as `[0.5m]` and 3s as `[0.05m]`.
///
/// ```text
///  [✓] Start of Pipeline
/// - [✓] Stage: Build
/// -- [✓] [0.3m] make build (logs: http://...)
/// ```
pub fn render_text(root: &StageNode) -> String {
    let mut out = String::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        render_line(&mut out, node, depth);
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }
    out
}

fn render_line(out: &mut String, node: &StageNode, depth: usize) {
    let _ = write!(out, "{} {}", "-".repeat(depth), status_tag(node));

    if let Some(ms) = node.duration_millis {
        let _ = write!(out, " [{}m]", ms as f64 / 60_000.0);
    }

    let _ = write!(out, " {}", node.display_name);

    if let Some(ref url) = node.log_url {
        let _ = write!(out, " (logs: {url})");
    }
    out.push('\n');
}

fn status_tag(node: &StageNode) -> &'static str {
    if node.running {
        return "[RUNNING]";
    }
    // Animated variants of a color mean "in progress" on the engine side.
    match node.icon_color.trim_end_matches("_anime") {
        "blue" => "[✓]",
        _ => "[✗]",
    }
}

/// Wire form of one node without its children.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StageFields<'a> {
    id: &'a str,
    display_name: &'a str,
    kind: StructuralKind,
    running: bool,
    icon_color: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_url_full: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_millis: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter_description: Option<&'a str>,
}

impl<'a> From<&'a StageNode> for StageFields<'a> {
    fn from(node: &'a StageNode) -> Self {
        Self {
            id: &node.id,
            display_name: &node.display_name,
            kind: node.kind,
            running: node.running,
            icon_color: &node.icon_color,
            log_url: node.log_url.as_deref(),
            log_url_full: node.log_url_full.as_deref(),
            duration_millis: node.duration_millis,
            parameter_description: node.parameter_description.as_deref(),
        }
    }
}

enum JsonStep<'a> {
    Open(&'a StageNode),
    Separator,
    Close,
}

/// Compact JSON: each node's fields in camelCase, absent optionals omitted,
/// followed by its `children` array.
pub fn render_json(root: &StageNode) -> Result<String> {
    let mut out = String::new();
    let mut stack = vec![JsonStep::Open(root)];

    while let Some(step) = stack.pop() {
        match step {
            JsonStep::Open(node) => {
                let fields = serde_json::to_string(&StageFields::from(node))?;
                // Reopen the object so `children` can follow the fields.
                out.push_str(fields.strip_suffix('}').unwrap_or(&fields));
                out.push_str(",\"children\":[");

                stack.push(JsonStep::Close);
                for (i, child) in node.children.iter().enumerate().rev() {
                    stack.push(JsonStep::Open(child));
                    if i > 0 {
                        stack.push(JsonStep::Separator);
                    }
                }
            }
            JsonStep::Separator => out.push(','),
            JsonStep::Close => out.push_str("]}"),
        }
    }

    Ok(out)
}
