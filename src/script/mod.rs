//! Edit scripts: a text stand-in for the interactive canvas.
//!
//! Each line is one user action. Replaying a script drives a
//! [`PipelineEditor`] exactly the way the canvas would, and reports the
//! verdict after every step.

pub mod parse;

pub use parse::{parse_script, parse_script_file};

use crate::editor::{Connection, EditError, LayoutConfig, PipelineEditor};
use crate::graph::{Node, Position};
use crate::validate::ValidationResult;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Node {
        id: String,
        label: String,
        kind: Option<String>,
    },
    Connect(Connection),
    DeleteNodes(Vec<String>),
    DeleteEdges(Vec<String>),
    Move {
        id: String,
        position: Position,
    },
    Layout,
    Undo,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Node { id, label, .. } => write!(f, "node {id} {label:?}"),
            Command::Connect(c) => write!(
                f,
                "connect {}:{} -> {}:{}",
                c.source, c.source_handle, c.target, c.target_handle
            ),
            Command::DeleteNodes(ids) => write!(f, "delete-node {}", ids.join(" ")),
            Command::DeleteEdges(ids) => write!(f, "delete-edge {}", ids.join(" ")),
            Command::Move { id, position } => write!(f, "move {id} {} {}", position.x, position.y),
            Command::Layout => f.write_str("layout"),
            Command::Undo => f.write_str("undo"),
        }
    }
}

/// A parsed command and the script line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub line: usize,
    pub command: Command,
}

/// What happened when a step was applied.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub line: usize,
    pub command: String,
    pub applied: bool,
    /// Rejection reason, or a short note on what changed.
    pub note: String,
    pub result: ValidationResult,
}

impl Command {
    /// Apply to the editor. Returns a short note on what changed.
    pub fn apply(&self, editor: &mut PipelineEditor, layout: &LayoutConfig) -> Result<String, EditError> {
        match self {
            Command::Node { id, label, kind } => {
                let mut node = Node::new(id.as_str(), label.as_str());
                node.kind = kind.clone();
                editor.insert_node(node).map(|id| format!("added node {id}"))
            }
            Command::Connect(c) => editor.connect(c.clone()).map(|id| format!("added edge {id}")),
            Command::DeleteNodes(ids) => editor
                .delete_nodes(ids.as_slice())
                .map(|n| format!("removed {n} node(s)")),
            Command::DeleteEdges(ids) => editor
                .delete_edges(ids.as_slice())
                .map(|n| format!("removed {n} edge(s)")),
            Command::Move { id, position } => editor
                .move_node(id, *position)
                .map(|()| format!("moved {id}")),
            Command::Layout => {
                editor.auto_layout(layout);
                Ok("laid out".to_string())
            }
            Command::Undo => Ok(if editor.undo() {
                "restored previous state".to_string()
            } else {
                "nothing to undo".to_string()
            }),
        }
    }
}

/// Apply every step in order. Rejected edits are reported, not fatal.
pub fn replay(editor: &mut PipelineEditor, steps: &[Step], layout: &LayoutConfig) -> Vec<StepOutcome> {
    steps
        .iter()
        .map(|step| {
            let (applied, note) = match step.command.apply(editor, layout) {
                Ok(note) => {
                    info!(line = step.line, command = %step.command, "{}", note);
                    (true, note)
                }
                Err(e) => {
                    warn!(line = step.line, command = %step.command, error = %e, "edit rejected");
                    (false, e.to_string())
                }
            };
            StepOutcome {
                line: step.line,
                command: step.command.to_string(),
                applied,
                note,
                result: editor.validation(),
            }
        })
        .collect()
}
