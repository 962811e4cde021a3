//! Headless pipeline editor.
//!
//! Owns the current snapshot and its undo history. Every structural edit
//! (add, connect, delete, layout) goes through [`EditHistory::record`], so the
//! prior state is captured exactly once and only if the edit is accepted.
//! Moving a node is positional and is not recorded.

pub mod error;
pub mod layout;

pub use error::EditError;
pub use layout::{LayoutConfig, apply_layout};

use crate::graph::{Edge, Handle, Node, Position, Snapshot};
use crate::history::EditHistory;
use crate::validate::{ValidationResult, validate};
use std::collections::HashSet;
use std::convert::Infallible;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// A requested connection between two node handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub source_handle: Handle,
    pub target_handle: Handle,
}

impl Connection {
    /// `source:out` -> `target:in`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: Handle::Out,
            target_handle: Handle::In,
        }
    }

    pub fn with_handles(mut self, source_handle: Handle, target_handle: Handle) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }

    fn edge_id(&self) -> String {
        format!(
            "e{}{}-{}{}",
            self.source, self.source_handle, self.target, self.target_handle
        )
    }
}

/// Millisecond-timestamp node ids, bumped past anything already handed out
/// or already in the graph.
#[derive(Debug, Clone, Default)]
struct NodeIds {
    last: u128,
}

impl NodeIds {
    fn next(&mut self, taken: impl Fn(&str) -> bool) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        let mut candidate = now.max(self.last + 1);
        while taken(&candidate.to_string()) {
            candidate += 1;
        }
        self.last = candidate;
        candidate.to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineEditor {
    state: Snapshot,
    history: EditHistory,
    ids: NodeIds,
}

impl PipelineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: EditHistory) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    /// Replace the whole graph (opening a file). Not an undoable step.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.state = snapshot;
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.state
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn validation(&self) -> ValidationResult {
        validate(&self.state.nodes, &self.state.edges)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        self.state.to_json_pretty()
    }

    /// Add a stage with a fresh id. Returns the id.
    pub fn add_node(&mut self, label: &str, kind: Option<&str>) -> Result<String, EditError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(EditError::EmptyLabel);
        }
        let id = self.ids.next(|id| self.state.contains_node(id));

        // Stagger new nodes so they do not stack on top of each other.
        let n = self.state.nodes.len();
        let position = Position::new((n % 5) as f64 * 50.0, (n / 5) as f64 * 50.0);

        let mut node = Node::new(id, label).at(position);
        node.kind = kind.map(str::to_string);
        self.insert_node(node)
    }

    /// Add a caller-built node as-is.
    pub fn insert_node(&mut self, node: Node) -> Result<String, EditError> {
        let id = self.history.record(&mut self.state, |s| {
            if node.label.trim().is_empty() {
                return Err(EditError::EmptyLabel);
            }
            if s.contains_node(&node.id) {
                return Err(EditError::DuplicateNode(node.id));
            }
            let id = node.id.clone();
            s.nodes.push(node);
            Ok(id)
        })?;
        info!(node = %id, "added node");
        Ok(id)
    }

    /// Connect two nodes. Returns the new edge id.
    pub fn connect(&mut self, conn: Connection) -> Result<String, EditError> {
        let id = self.history.record(&mut self.state, |s| {
            if conn.source == conn.target {
                return Err(EditError::SelfLoop(conn.source));
            }
            if conn.source_handle != Handle::Out || conn.target_handle != Handle::In {
                return Err(EditError::InvalidHandles {
                    from: conn.source_handle,
                    to: conn.target_handle,
                });
            }
            for end in [&conn.source, &conn.target] {
                if !s.contains_node(end) {
                    return Err(EditError::UnknownNode(end.clone()));
                }
            }
            let exists = s.edges.iter().any(|e| {
                e.source == conn.source
                    && e.target == conn.target
                    && e.source_handle == conn.source_handle
                    && e.target_handle == conn.target_handle
            });
            if exists {
                return Err(EditError::DuplicateEdge {
                    from: conn.source,
                    to: conn.target,
                });
            }

            let mut id = conn.edge_id();
            while s.contains_edge(&id) {
                id.push('\'');
            }
            s.edges.push(Edge {
                id: id.clone(),
                source: conn.source,
                target: conn.target,
                source_handle: conn.source_handle,
                target_handle: conn.target_handle,
            });
            Ok(id)
        })?;
        info!(edge = %id, "connected");
        Ok(id)
    }

    /// Delete nodes and every edge touching them. Returns how many nodes went.
    pub fn delete_nodes<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<usize, EditError> {
        let doomed: HashSet<&str> = ids.iter().map(|id| id.as_ref()).collect();
        let removed = self.history.record(&mut self.state, |s| {
            let before = s.nodes.len();
            s.nodes.retain(|n| !doomed.contains(n.id.as_str()));
            let removed = before - s.nodes.len();
            if removed == 0 {
                return Err(EditError::NothingToDelete {
                    what: "node",
                    ids: doomed.iter().map(|id| id.to_string()).collect(),
                });
            }
            s.edges.retain(|e| !doomed.iter().any(|id| e.touches(id)));
            Ok(removed)
        })?;
        info!(removed, "deleted nodes");
        Ok(removed)
    }

    /// Delete edges by id. Returns how many went.
    pub fn delete_edges<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<usize, EditError> {
        let doomed: HashSet<&str> = ids.iter().map(|id| id.as_ref()).collect();
        let removed = self.history.record(&mut self.state, |s| {
            let before = s.edges.len();
            s.edges.retain(|e| !doomed.contains(e.id.as_str()));
            let removed = before - s.edges.len();
            if removed == 0 {
                return Err(EditError::NothingToDelete {
                    what: "edge",
                    ids: doomed.iter().map(|id| id.to_string()).collect(),
                });
            }
            Ok(removed)
        })?;
        info!(removed, "deleted edges");
        Ok(removed)
    }

    /// Drag a node. Not an undoable step.
    pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), EditError> {
        let node = self
            .state
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| EditError::UnknownNode(id.to_string()))?;
        node.position = position;
        Ok(())
    }

    pub fn auto_layout(&mut self, config: &LayoutConfig) {
        let Ok(()) = self.history.record(&mut self.state, |s| {
            apply_layout(s, config);
            Ok::<(), Infallible>(())
        });
        info!(nodes = self.state.nodes.len(), "auto layout");
    }

    /// Restore the state before the last recorded edit. `false` if there was
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(prev) => {
                self.state = prev;
                info!("undo");
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
}
