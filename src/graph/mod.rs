//! Graph snapshot types shared by the validator, the history and the editor.
//!
//! JSON shape:
//! {
//!   "nodes": [
//!     { "id": "1", "label": "extract", "position": { "x": 0, "y": 0 }, "kind": "input" }
//!   ],
//!   "edges": [
//!     { "id": "e1", "source": "1", "target": "2", "sourceHandle": "out", "targetHandle": "in" }
//!   ]
//! }
//!
//! Ids are opaque strings supplied by whoever creates the node or edge.
//! Nothing here enforces uniqueness or that edges point at existing nodes;
//! consumers must tolerate both.

pub mod handle;

pub use handle::Handle;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    #[serde(default)]
    pub label: String,

    /// Canvas position. Only the editor and layout care about it.
    #[serde(default)]
    pub position: Position,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            position: Position::default(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// Directed connection from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,

    #[serde(default = "Handle::default_source")]
    pub source_handle: Handle,

    #[serde(default = "Handle::default_target")]
    pub target_handle: Handle,
}

impl Edge {
    /// Edge using the standard `out` -> `in` handles.
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: Handle::Out,
            target_handle: Handle::In,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Full node/edge state at one instant. The unit of undo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Snapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.iter().any(|e| e.id == id)
    }

    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a snapshot JSON file.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read graph file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parse graph file {}", path.display()))
    }
}
