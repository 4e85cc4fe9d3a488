//! Tree flattening over JSON nodes.
//!
//! Nodes are JSON objects with an `id`, an optional `parent_id`, a `name`,
//! and nested nodes under a children field and a step-children field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

type LabelFn = Box<dyn Fn(&Value) -> Value>;
type SkipFn = Box<dyn Fn(&Value) -> bool>;

/// How [`flatten_tree`] walks and labels nodes.
pub struct FlattenOptions {
    /// Field holding child nodes.
    pub children_field: String,
    /// Second field of nested nodes, walked after the children.
    pub step_children_field: Option<String>,
    /// Produces the `value` label; defaults to the node's `name`.
    pub label: Option<LabelFn>,
    /// Nodes for which this returns true are left out (their subtrees are not).
    pub skip: Option<SkipFn>,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            children_field: "children".to_string(),
            step_children_field: None,
            label: None,
            skip: None,
        }
    }
}

impl FlattenOptions {
    pub fn step_children(mut self, field: impl Into<String>) -> Self {
        self.step_children_field = Some(field.into());
        self
    }

    pub fn label(mut self, f: impl Fn(&Value) -> Value + 'static) -> Self {
        self.label = Some(Box::new(f));
        self
    }

    pub fn skip(mut self, f: impl Fn(&Value) -> bool + 'static) -> Self {
        self.skip = Some(Box::new(f));
        self
    }
}

/// Flatten nodes depth-first, parents before their descendants.
///
/// Each emitted node is a copy without its child fields, plus a `value` label.
pub fn flatten_tree(nodes: &[Value], options: &FlattenOptions) -> Vec<Value> {
    let mut out = Vec::new();
    for node in nodes {
        flatten_into(node, options, &mut out);
    }
    out
}

fn flatten_into(node: &Value, options: &FlattenOptions, out: &mut Vec<Value>) {
    let skipped = options.skip.as_ref().is_some_and(|skip| skip(node));

    if !skipped {
        if let Value::Object(fields) = node {
            let mut flat = fields.clone();
            flat.remove(&options.children_field);
            if let Some(step) = &options.step_children_field {
                flat.remove(step);
            }
            let label = match &options.label {
                Some(label) => label(node),
                None => node.get("name").cloned().unwrap_or(Value::Null),
            };
            flat.insert("value".to_string(), label);
            out.push(Value::Object(flat));
        }
    }

    let nested = std::iter::once(options.children_field.as_str())
        .chain(options.step_children_field.as_deref());
    for field in nested {
        if let Some(Value::Array(children)) = node.get(field) {
            for child in children {
                flatten_into(child, options, out);
            }
        }
    }
}

/// One entry of a node's lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub id: Value,
    pub value: Value,
}

/// Lineage of the node with `id`, root first, the node itself last.
///
/// Empty when the node is not present. Stops at cycles.
pub fn node_path(id: &Value, flattened: &[Value]) -> Vec<PathNode> {
    let find = |id: &Value| flattened.iter().find(|n| n.get("id") == Some(id));

    let Some(mut node) = find(id) else {
        return Vec::new();
    };

    let mut path = Vec::new();
    loop {
        path.push(PathNode {
            id: node.get("id").cloned().unwrap_or(Value::Null),
            value: node.get("value").cloned().unwrap_or(Value::Null),
        });
        if path.len() > flattened.len() {
            tracing::warn!("Cycle detected while walking node lineage");
            break;
        }
        match node.get("parent_id").filter(|p| !p.is_null()).and_then(find) {
            Some(parent) => node = parent,
            None => break,
        }
    }

    path.reverse();
    path
}
