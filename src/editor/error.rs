//! Edit rejections.

use crate::graph::Handle;
use thiserror::Error;

/// Why an edit was refused. A refused edit changes neither the graph nor the
/// history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("node label must not be empty")]
    EmptyLabel,

    #[error("node '{0}' already exists")]
    DuplicateNode(String),

    #[error("unknown node '{0}'")]
    UnknownNode(String),

    #[error("cannot connect node '{0}' to itself")]
    SelfLoop(String),

    /// Only `out` -> `in` connections are accepted.
    #[error("connection must run from an 'out' handle to an 'in' handle, got '{from}' -> '{to}'")]
    InvalidHandles { from: Handle, to: Handle },

    #[error("'{from}' is already connected to '{to}'")]
    DuplicateEdge { from: String, to: String },

    #[error("nothing to delete: no {what} matches {ids:?}")]
    NothingToDelete { what: &'static str, ids: Vec<String> },
}
