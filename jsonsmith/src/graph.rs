//! JSON tree to node/edge graph conversion
//!
//! Every object key and array element below the root becomes one node, linked
//! to its parent by one edge, so a graph always has `nodes - 1` edges. Node
//! ids are assigned in pre-order and carry no identity across edits.

use serde::Serialize;
use serde_json::Value;

/// Horizontal distance between consecutive siblings
pub const HORIZONTAL_SPACING: f64 = 220.0;

/// Vertical distance between tree levels
pub const VERTICAL_SPACING: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Object,
    Array,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Nodes and edges for one JSON document
#[derive(Debug, Clone, Default, Serialize)]
pub struct JsonGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl JsonGraph {
    /// Ids of the direct children of `id`, in document order
    pub fn children(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .map(|e| e.target.as_str())
            .collect()
    }
}

/// Convert a JSON document into a graph rooted at a node labelled `root`.
///
/// Recursion depth is bounded by the document depth, which `serde_json`
/// already caps when parsing text.
pub fn build_graph(document: &Value) -> JsonGraph {
    let mut builder = GraphBuilder::default();
    builder.visit("root", document, None, 0.0, 0);
    builder.graph
}

#[derive(Default)]
struct GraphBuilder {
    graph: JsonGraph,
}

impl GraphBuilder {
    fn next_id(&self) -> String {
        format!("node-{}", self.graph.nodes.len())
    }

    fn visit(&mut self, key: &str, value: &Value, parent: Option<&str>, x: f64, depth: usize) {
        let id = self.next_id();
        let is_root = parent.is_none();

        let (kind, label) = match value {
            Value::Object(_) if is_root => (NodeKind::Object, key.to_string()),
            Value::Array(_) if is_root => (NodeKind::Array, key.to_string()),
            Value::Object(map) => (NodeKind::Object, format!("{key} {{{}}}", map.len())),
            Value::Array(items) => (NodeKind::Array, format!("{key} [{}]", items.len())),
            scalar => (NodeKind::Value, format!("{key}: {}", display_scalar(scalar))),
        };

        self.graph.nodes.push(GraphNode {
            id: id.clone(),
            label,
            kind,
            position: Position {
                x,
                y: depth as f64 * VERTICAL_SPACING,
            },
        });

        if let Some(parent) = parent {
            self.graph.edges.push(GraphEdge {
                id: format!("edge-{parent}-{id}"),
                source: parent.to_string(),
                target: id.clone(),
            });
        }

        match value {
            Value::Object(map) => {
                for (index, (child_key, child)) in map.iter().enumerate() {
                    let child_x = x + index as f64 * HORIZONTAL_SPACING;
                    self.visit(child_key, child, Some(&id), child_x, depth + 1);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    let child_x = x + index as f64 * HORIZONTAL_SPACING;
                    self.visit(&format!("[{index}]"), child, Some(&id), child_x, depth + 1);
                }
            }
            _ => {}
        }
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
