//! Pipeline DAG core: graph validation, undo history, and a headless editor.
//!
//! Layers:
//! - graph: node/edge snapshot types shared by everything else
//! - validate: pure DAG verdict over a snapshot
//! - history: linear undo stack of snapshots
//! - editor: edit operations that snapshot before they mutate
//! - script / render: text input and output for the CLI

pub mod editor;
pub mod graph;
pub mod history;
pub mod render;
pub mod script;
pub mod validate;

pub type Result<T> = anyhow::Result<T>;

pub use editor::{Connection, EditError, LayoutConfig, PipelineEditor};
pub use graph::{Edge, Handle, Node, Position, Snapshot};
pub use history::EditHistory;
pub use validate::{ValidationResult, Verdict, validate};
